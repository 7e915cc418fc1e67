//! Reads one decompressed archive directory of per-article XML files.

mod record;

pub use record::{LABEL_SEPARATOR, ParsedDocument, RecordFields, parse_document};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{LabelCounts, PubDate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-archive counters. Every examined file increments `files`, plus at
/// most one of the skip counters or a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files: usize,
    pub no_record: usize,
    pub no_object_type: usize,
    pub no_object_type_value: usize,
    pub no_pub_date: usize,
    pub failures: Vec<FileFailure>,
}

/// Result of scanning one archive directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveScan {
    pub label_counts: LabelCounts,
    pub min_date: Option<PubDate>,
    pub max_date: Option<PubDate>,
    pub stats: ScanStats,
}

impl ArchiveScan {
    fn observe_date(&mut self, date: PubDate) {
        self.min_date = Some(self.min_date.map_or(date, |d| d.min(date)));
        self.max_date = Some(self.max_date.map_or(date, |d| d.max(date)));
    }

    #[must_use]
    pub fn article_count(&self) -> i64 {
        self.label_counts.values().sum()
    }
}

/// What one article file contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSummary {
    NoRecord,
    Record {
        label: LabelField,
        pub_date: Option<PubDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelField {
    Missing,
    Empty,
    Value(String),
}

/// Reads and summarizes a single article file.
///
/// An unreadable file, malformed XML, or a publication date that is not a
/// real `YYYYMMDD` calendar date all fail with [`Error::Parse`].
pub fn read_article(path: &Path) -> Result<FileSummary> {
    let xml = fs::read_to_string(path).map_err(|e| Error::parse(path, e))?;
    let fields = match parse_document(&xml).map_err(|reason| Error::parse(path, reason))? {
        ParsedDocument::NoRecord => return Ok(FileSummary::NoRecord),
        ParsedDocument::Record(fields) => fields,
    };

    let pub_date = fields
        .numeric_pub_date_text()
        .map(|text| {
            text.parse::<PubDate>()
                .map_err(|reason| Error::parse(path, format!("NumericPubDate: {reason}")))
        })
        .transpose()?;

    let label = match (&fields.object_types, fields.object_type_label()) {
        (None, _) => LabelField::Missing,
        (Some(_), None) => LabelField::Empty,
        (Some(_), Some(label)) => LabelField::Value(label),
    };

    Ok(FileSummary::Record { label, pub_date })
}

/// Lists the `*.xml` files directly inside `dir`, sorted by path.
pub fn article_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::path(dir, "directory does not exist"));
    }
    if !dir.is_dir() {
        return Err(Error::path(dir, "not a directory"));
    }
    fs::read_dir(dir).map_err(|e| Error::path(dir, e))?;

    let pattern = format!(
        "{}/*.xml",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| Error::path(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// Counts object type labels and tracks the publication date range of one
/// archive directory.
///
/// Individual files that fail to read or parse are recorded in
/// [`ScanStats::failures`] and contribute nothing. Only a missing or
/// unreadable directory fails the whole scan.
pub fn scan(dir: &Path) -> Result<ArchiveScan> {
    let files = article_files(dir)?;
    let mut scan = ArchiveScan::default();

    for path in files {
        scan.stats.files += 1;

        let (label, pub_date) = match read_article(&path) {
            Ok(FileSummary::NoRecord) => {
                debug!(path = %path.display(), "No Record element");
                scan.stats.no_record += 1;
                continue;
            }
            Ok(FileSummary::Record { label, pub_date }) => (label, pub_date),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping article file");
                scan.stats.failures.push(FileFailure {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match label {
            LabelField::Value(label) => *scan.label_counts.entry(label).or_insert(0) += 1,
            LabelField::Empty => scan.stats.no_object_type_value += 1,
            LabelField::Missing => scan.stats.no_object_type += 1,
        }

        match pub_date {
            Some(date) => scan.observe_date(date),
            None => scan.stats.no_pub_date += 1,
        }
    }

    info!(
        dir = %dir.display(),
        files = scan.stats.files,
        labels = scan.label_counts.len(),
        failed = scan.stats.failures.len(),
        "Scanned archive"
    );

    Ok(scan)
}

/// Groups the article files of `dir` by object type label.
///
/// Files without a label or that fail to parse are left out.
pub fn map_files_to_types(dir: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>> {
    let mut map: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for path in article_files(dir)? {
        match read_article(&path) {
            Ok(FileSummary::Record {
                label: LabelField::Value(label),
                ..
            }) => map.entry(label).or_default().push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping article file"),
        }
    }

    Ok(map)
}
