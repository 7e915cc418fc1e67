use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A canonical entry in the object type taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Index into the same table; never a pointer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type_id: Option<i64>,
    pub last_modified: DateTime<Utc>,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(slug) = self.slug.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " - {slug}")?;
        }
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " - {name}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewObjectType {
    pub raw_value: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_type_id: Option<i64>,
}

/// A surface form recorded against a canonical object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeRawValue {
    pub id: i64,
    pub object_type_id: i64,
    pub raw_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Newspaper {
    pub id: i64,
    pub paper_identifier: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_folder_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompressed_folder_path: Option<PathBuf>,
    /// Opaque reference to a newspaper entity owned by another system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_newspaper_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Newspaper {
    /// Path of the compressed bundle that decompresses into `archive_identifier`.
    #[must_use]
    pub fn compressed_archive_path(&self, archive_identifier: &str) -> Option<PathBuf> {
        self.compressed_folder_path
            .as_ref()
            .map(|dir| dir.join(format!("{archive_identifier}.zip")))
    }
}

impl fmt::Display for Newspaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} from {} to {}",
            self.id, self.paper_identifier, self.start_year, self.end_year
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewNewspaper {
    pub paper_identifier: String,
    pub start_year: i32,
    pub end_year: i32,
    pub compressed_folder_path: Option<PathBuf>,
    pub uncompressed_folder_path: Option<PathBuf>,
    pub external_newspaper_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    pub id: i64,
    pub newspaper_id: i64,
    pub archive_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompressed_folder_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewArchive {
    pub newspaper_id: i64,
    pub archive_identifier: String,
    pub compressed_file_path: Option<PathBuf>,
    pub uncompressed_folder_path: Option<PathBuf>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperObjectTypeCount {
    pub id: i64,
    pub newspaper_id: i64,
    pub object_type_id: i64,
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveObjectTypeCount {
    pub id: i64,
    pub archive_id: i64,
    pub object_type_id: i64,
    pub item_count: i64,
}
