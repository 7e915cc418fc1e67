//! Idempotent writes of newspapers, archives and their per-type counts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::CountPolicy;
use crate::error::{Error, Result};
use crate::registry::ObjectTypeRegistry;
use crate::scanner::ArchiveScan;
use crate::store::{Fetched, Store, fetch_or_create};
use crate::types::{
    Archive, ArchiveObjectTypeCount, LabelCounts, NewArchive, NewNewspaper, Newspaper,
    PaperObjectTypeCount,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFailure {
    pub label: String,
    pub reason: String,
}

/// What a bind pass did. Row counters are per object type; failures are
/// per label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindReport {
    pub created: usize,
    pub kept: usize,
    pub refreshed: usize,
    pub failed: Vec<LabelFailure>,
}

impl BindReport {
    fn fail(&mut self, label: &str, e: &Error) {
        if e.is_storage() {
            error!(label, error = %e, "Skipping label");
        } else {
            warn!(label, error = %e, "Skipping label");
        }
        self.failed.push(LabelFailure {
            label: label.to_string(),
            reason: e.to_string(),
        });
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveBinding {
    pub archive: Archive,
    pub archive_created: bool,
    pub report: BindReport,
}

enum CountOutcome {
    Created,
    Kept,
    Refreshed,
}

trait CountRow {
    fn id(&self) -> i64;
    fn item_count(&self) -> i64;
}

impl CountRow for PaperObjectTypeCount {
    fn id(&self) -> i64 {
        self.id
    }

    fn item_count(&self) -> i64 {
        self.item_count
    }
}

impl CountRow for ArchiveObjectTypeCount {
    fn id(&self) -> i64 {
        self.id
    }

    fn item_count(&self) -> i64 {
        self.item_count
    }
}

/// Writes scan results through the store, resolving labels with a
/// registry whose cache lives as long as the binder.
pub struct PersistenceBinder<'s> {
    store: &'s dyn Store,
    registry: ObjectTypeRegistry<'s>,
    policy: CountPolicy,
}

impl<'s> PersistenceBinder<'s> {
    pub fn new(store: &'s dyn Store, policy: CountPolicy) -> Self {
        Self {
            store,
            registry: ObjectTypeRegistry::new(store),
            policy,
        }
    }

    pub fn store(&self) -> &'s dyn Store {
        self.store
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    pub fn registry(&self) -> &ObjectTypeRegistry<'s> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ObjectTypeRegistry<'s> {
        &mut self.registry
    }

    /// Fetches the newspaper with this identifier or creates it. An existing
    /// row is returned as stored; the other fields of `new` are ignored.
    pub fn register_newspaper(&self, new: &NewNewspaper) -> Result<Fetched<Newspaper>> {
        let identifier = new.paper_identifier.trim();
        if identifier.is_empty() {
            return Err(Error::InvalidInput(
                "paper identifier cannot be empty".to_string(),
            ));
        }
        if new.start_year > new.end_year {
            return Err(Error::InvalidInput(format!(
                "start year {} is after end year {}",
                new.start_year, new.end_year
            )));
        }

        let store = self.store;
        let fetched = fetch_or_create(
            "newspaper",
            identifier,
            || store.find_newspapers_by_identifier(identifier),
            || {
                store.create_newspaper(&NewNewspaper {
                    paper_identifier: identifier.to_string(),
                    ..new.clone()
                })
            },
        )?;

        if fetched.was_created() {
            info!(paper = identifier, id = fetched.get().id, "Registered newspaper");
        }
        Ok(fetched)
    }

    /// Records one scanned archive: fetches or creates its row, overwrites
    /// its date range and writes a count row per object type.
    pub fn bind_archive_counts(
        &mut self,
        newspaper: &Newspaper,
        archive_identifier: &str,
        uncompressed_dir: Option<&Path>,
        scan: &ArchiveScan,
    ) -> Result<ArchiveBinding> {
        if archive_identifier.trim().is_empty() {
            return Err(Error::InvalidInput(
                "archive identifier cannot be empty".to_string(),
            ));
        }

        let store = self.store;
        let fetched = fetch_or_create(
            "archive",
            archive_identifier,
            || store.find_archives(newspaper.id, archive_identifier),
            || {
                store.create_archive(&NewArchive {
                    newspaper_id: newspaper.id,
                    archive_identifier: archive_identifier.to_string(),
                    compressed_file_path: newspaper.compressed_archive_path(archive_identifier),
                    uncompressed_folder_path: uncompressed_dir.map(Path::to_path_buf),
                    ..NewArchive::default()
                })
            },
        )?;
        let archive_created = fetched.was_created();
        let mut archive = fetched.into_inner();

        let start_date = scan.min_date.and_then(|d| d.to_naive_date());
        let end_date = scan.max_date.and_then(|d| d.to_naive_date());
        store.update_archive_dates(archive.id, start_date, end_date)?;
        archive.start_date = start_date;
        archive.end_date = end_date;

        let archive_id = archive.id;
        let policy = self.policy;
        let report = self.bind_counts(&scan.label_counts, |object_type_id, count| {
            let key = format!("{archive_identifier}/{object_type_id}");
            let fetched = fetch_or_create(
                "archive object type count",
                &key,
                || store.find_archive_type_counts(archive_id, object_type_id),
                || store.create_archive_type_count(archive_id, object_type_id, count),
            )?;
            apply_policy(policy, fetched, count, |id| {
                store.update_archive_type_count(id, count)
            })
        });

        info!(
            archive = archive_identifier,
            created = archive_created,
            labels = scan.label_counts.len(),
            new_counts = report.created,
            failed = report.failed.len(),
            "Bound archive counts"
        );

        Ok(ArchiveBinding {
            archive,
            archive_created,
            report,
        })
    }

    /// Writes a paper-level count row per object type.
    pub fn bind_paper_counts(&mut self, newspaper: &Newspaper, counts: &LabelCounts) -> BindReport {
        let store = self.store;
        let policy = self.policy;
        let newspaper_id = newspaper.id;
        let paper = newspaper.paper_identifier.as_str();

        let report = self.bind_counts(counts, |object_type_id, count| {
            let key = format!("{paper}/{object_type_id}");
            let fetched = fetch_or_create(
                "newspaper object type count",
                &key,
                || store.find_paper_type_counts(newspaper_id, object_type_id),
                || store.create_paper_type_count(newspaper_id, object_type_id, count),
            )?;
            apply_policy(policy, fetched, count, |id| {
                store.update_paper_type_count(id, count)
            })
        });

        info!(
            paper,
            labels = counts.len(),
            new_counts = report.created,
            failed = report.failed.len(),
            "Bound paper counts"
        );
        report
    }

    /// Resolves every label, sums the counts of labels sharing an object
    /// type, then writes one row per type.
    fn bind_counts<F>(&mut self, counts: &LabelCounts, mut write: F) -> BindReport
    where
        F: FnMut(i64, i64) -> Result<CountOutcome>,
    {
        let mut report = BindReport::default();
        let mut by_type: BTreeMap<i64, (i64, Vec<&str>)> = BTreeMap::new();

        for (label, &count) in counts {
            match self.registry.resolve(label) {
                Ok(object_type) => {
                    let (total, labels) = by_type.entry(object_type.id).or_default();
                    *total += count;
                    labels.push(label);
                }
                Err(e) => report.fail(label, &e),
            }
        }

        for (object_type_id, (count, labels)) in by_type {
            if labels.len() > 1 {
                debug!(object_type_id, count, labels = ?labels, "Summed synonym counts");
            }
            match write(object_type_id, count) {
                Ok(CountOutcome::Created) => report.created += 1,
                Ok(CountOutcome::Kept) => report.kept += 1,
                Ok(CountOutcome::Refreshed) => report.refreshed += 1,
                Err(e) => {
                    for label in labels {
                        report.fail(label, &e);
                    }
                }
            }
        }

        report
    }
}

fn apply_policy<T, U>(policy: CountPolicy, fetched: Fetched<T>, count: i64, update: U) -> Result<CountOutcome>
where
    T: CountRow,
    U: FnOnce(i64) -> Result<()>,
{
    match fetched {
        Fetched::Created(_) => Ok(CountOutcome::Created),
        Fetched::Existing(row) if policy == CountPolicy::Refresh && row.item_count() != count => {
            debug!(id = row.id(), from = row.item_count(), to = count, "Refreshing count");
            update(row.id())?;
            Ok(CountOutcome::Refreshed)
        }
        Fetched::Existing(_) => Ok(CountOutcome::Kept),
    }
}
