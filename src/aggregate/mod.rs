//! Drives a whole newspaper: scans each archive directory, binds its
//! counts, and sums them into paper totals.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::binder::{BindReport, PersistenceBinder};
use crate::config::CountPolicy;
use crate::error::{Error, Result};
use crate::scanner::{self, ScanStats};
use crate::store::Store;
use crate::types::{LabelCounts, Newspaper, PubDate, merge_counts};

/// One archive directory that was scanned.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutcome {
    pub archive_identifier: String,
    pub path: PathBuf,
    pub label_counts: LabelCounts,
    pub min_date: Option<PubDate>,
    pub max_date: Option<PubDate>,
    pub stats: ScanStats,
    /// Set when the archive row was written.
    pub archive_id: Option<i64>,
    pub report: Option<BindReport>,
    /// Set when persistence failed. The counts are still part of the paper totals.
    pub bind_error: Option<String>,
}

/// An archive directory that could not be scanned and contributed nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveFailure {
    pub archive_identifier: String,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaperSummary {
    pub paper_identifier: String,
    pub label_counts: LabelCounts,
    pub archives: Vec<ArchiveOutcome>,
    pub failed_archives: Vec<ArchiveFailure>,
    pub report: BindReport,
}

impl PaperSummary {
    #[must_use]
    pub fn article_count(&self) -> i64 {
        self.label_counts.values().sum()
    }
}

pub struct PaperAggregator<'s> {
    binder: PersistenceBinder<'s>,
}

impl<'s> PaperAggregator<'s> {
    pub fn new(store: &'s dyn Store, policy: CountPolicy) -> Self {
        Self::with_binder(PersistenceBinder::new(store, policy))
    }

    pub fn with_binder(binder: PersistenceBinder<'s>) -> Self {
        Self { binder }
    }

    pub fn binder(&self) -> &PersistenceBinder<'s> {
        &self.binder
    }

    pub fn binder_mut(&mut self) -> &mut PersistenceBinder<'s> {
        &mut self.binder
    }

    /// Drops cached object types so the next run sees the store as it is.
    pub fn reset_cache(&mut self) {
        self.binder.registry_mut().reset();
    }

    /// Scans every archive directory under the paper's decompressed root,
    /// binds each archive, then binds the merged paper totals.
    ///
    /// An archive that fails to scan is logged and skipped. Fails only when
    /// the paper has no decompressed root or the root cannot be listed.
    pub fn process_newspaper(&mut self, newspaper: &Newspaper) -> Result<PaperSummary> {
        let paper = newspaper.paper_identifier.as_str();
        let root = newspaper.uncompressed_folder_path.as_deref().ok_or_else(|| {
            Error::InvalidInput(format!("newspaper {paper} has no uncompressed folder path"))
        })?;

        let started = Instant::now();
        let mut label_counts = LabelCounts::new();
        let mut archives = Vec::new();
        let mut failed_archives = Vec::new();

        for dir in archive_dirs(root)? {
            match self.process_archive(newspaper, &dir) {
                Ok(outcome) => {
                    merge_counts(&mut label_counts, &outcome.label_counts);
                    archives.push(outcome);
                }
                Err(e) => {
                    error!(paper, path = %dir.display(), error = %e, "Failed to scan archive");
                    failed_archives.push(ArchiveFailure {
                        archive_identifier: archive_identifier(&dir),
                        path: dir,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = self.binder.bind_paper_counts(newspaper, &label_counts);

        info!(
            paper,
            archives = archives.len(),
            failed = failed_archives.len(),
            labels = label_counts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed newspaper"
        );

        Ok(PaperSummary {
            paper_identifier: newspaper.paper_identifier.clone(),
            label_counts,
            archives,
            failed_archives,
            report,
        })
    }

    /// Scans and binds a single archive directory of `newspaper`.
    ///
    /// A scan failure is returned as an error. A bind failure is recorded
    /// in the outcome instead, since the scanned counts remain valid.
    pub fn process_archive(&mut self, newspaper: &Newspaper, dir: &Path) -> Result<ArchiveOutcome> {
        let identifier = archive_identifier(dir);
        let started = Instant::now();
        let scan = scanner::scan(dir)?;

        let (archive_id, report, bind_error) =
            match self
                .binder
                .bind_archive_counts(newspaper, &identifier, Some(dir), &scan)
            {
                Ok(binding) => (Some(binding.archive.id), Some(binding.report), None),
                Err(e) => {
                    error!(archive = identifier.as_str(), error = %e, "Failed to bind archive");
                    (None, None, Some(e.to_string()))
                }
            };

        info!(
            paper = newspaper.paper_identifier.as_str(),
            archive = identifier.as_str(),
            files = scan.stats.files,
            articles = scan.article_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed archive"
        );

        Ok(ArchiveOutcome {
            archive_identifier: identifier,
            path: dir.to_path_buf(),
            label_counts: scan.label_counts,
            min_date: scan.min_date,
            max_date: scan.max_date,
            stats: scan.stats,
            archive_id,
            report,
            bind_error,
        })
    }
}

fn archive_identifier(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned())
}

/// Immediate subdirectories of `root`, sorted by path.
fn archive_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::path(root, "not a directory"));
    }

    let entries = fs::read_dir(root).map_err(|e| Error::path(root, e))?;
    Ok(collect_dirs(root, entries.map(|entry| entry.map(|e| e.path()))))
}

/// Keeps the directories among `entries`. An entry that cannot be read is
/// logged and skipped.
fn collect_dirs<I>(root: &Path, entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut dirs: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| {
            entry
                .inspect_err(|e| {
                    warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                })
                .ok()
        })
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}
