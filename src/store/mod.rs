mod fetch;
mod schema;
mod sqlite;

pub use fetch::{Fetched, fetch_or_create};
pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::types::*;

/// Row totals per table, for status output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub object_types: i64,
    pub object_type_raw_values: i64,
    pub newspapers: i64,
    pub archives: i64,
    pub newspaper_object_types: i64,
    pub archive_object_types: i64,
}

/// Store defines the database interface.
///
/// Lookups that back a fetch-or-create return every match so callers can
/// detect a broken uniqueness assumption instead of silently picking one.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Object type operations
    fn create_object_type(&self, object_type: &NewObjectType) -> Result<ObjectType>;
    fn get_object_type(&self, id: i64) -> Result<Option<ObjectType>>;
    fn find_object_types_by_raw_value(&self, raw_value: &str) -> Result<Vec<ObjectType>>;
    fn list_object_types(&self) -> Result<Vec<ObjectType>>;
    fn update_object_type(&self, object_type: &ObjectType) -> Result<()>;

    // Synonym operations
    fn create_object_type_raw_value(
        &self,
        object_type_id: i64,
        raw_value: &str,
    ) -> Result<ObjectTypeRawValue>;
    fn count_object_type_raw_values(&self, object_type_id: i64, raw_value: &str) -> Result<i64>;
    fn find_raw_value_owners(&self, raw_value: &str) -> Result<Vec<i64>>;
    fn list_object_type_raw_values(&self, object_type_id: i64) -> Result<Vec<ObjectTypeRawValue>>;

    // Newspaper operations
    fn create_newspaper(&self, newspaper: &NewNewspaper) -> Result<Newspaper>;
    fn find_newspapers_by_identifier(&self, paper_identifier: &str) -> Result<Vec<Newspaper>>;
    fn list_newspapers(&self) -> Result<Vec<Newspaper>>;

    // Archive operations
    fn create_archive(&self, archive: &NewArchive) -> Result<Archive>;
    fn find_archives(&self, newspaper_id: i64, archive_identifier: &str) -> Result<Vec<Archive>>;
    fn list_archives(&self, newspaper_id: i64) -> Result<Vec<Archive>>;
    fn update_archive_dates(
        &self,
        id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()>;

    // Newspaper-level counts
    fn create_paper_type_count(
        &self,
        newspaper_id: i64,
        object_type_id: i64,
        item_count: i64,
    ) -> Result<PaperObjectTypeCount>;
    fn find_paper_type_counts(
        &self,
        newspaper_id: i64,
        object_type_id: i64,
    ) -> Result<Vec<PaperObjectTypeCount>>;
    fn list_paper_type_counts(&self, newspaper_id: i64) -> Result<Vec<PaperObjectTypeCount>>;
    fn update_paper_type_count(&self, id: i64, item_count: i64) -> Result<()>;

    // Archive-level counts
    fn create_archive_type_count(
        &self,
        archive_id: i64,
        object_type_id: i64,
        item_count: i64,
    ) -> Result<ArchiveObjectTypeCount>;
    fn find_archive_type_counts(
        &self,
        archive_id: i64,
        object_type_id: i64,
    ) -> Result<Vec<ArchiveObjectTypeCount>>;
    fn list_archive_type_counts(&self, archive_id: i64) -> Result<Vec<ArchiveObjectTypeCount>>;
    fn update_archive_type_count(&self, id: i64, item_count: i64) -> Result<()>;

    fn count_rows(&self) -> Result<StoreCounts>;

    fn close(&self) -> Result<()>;
}
