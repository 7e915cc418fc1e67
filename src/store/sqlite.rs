use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{Store, StoreCounts};
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

const OBJECT_TYPE_COLUMNS: &str =
    "id, raw_value, slug, name, description, parent_type_id, last_modified";
const NEWSPAPER_COLUMNS: &str = "id, paper_identifier, start_year, end_year, compressed_folder_path, uncompressed_folder_path, external_newspaper_id, notes";
const ARCHIVE_COLUMNS: &str = "id, newspaper_id, archive_identifier, compressed_file_path, uncompressed_folder_path, start_date, end_date, notes";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Nothing survives the store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| tracing::error!("Invalid date in database: '{}' - {}", s, e))
        .ok()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn path_to_sql(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Translates a unique-constraint failure into an integrity conflict.
fn map_insert_error(err: rusqlite::Error, what: impl FnOnce() -> String) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Error::IntegrityConflict(what())
        }
        e => Error::from(e),
    }
}

fn object_type_from_row(row: &Row<'_>) -> rusqlite::Result<ObjectType> {
    Ok(ObjectType {
        id: row.get(0)?,
        raw_value: row.get(1)?,
        slug: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        parent_type_id: row.get(5)?,
        last_modified: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn raw_value_from_row(row: &Row<'_>) -> rusqlite::Result<ObjectTypeRawValue> {
    Ok(ObjectTypeRawValue {
        id: row.get(0)?,
        object_type_id: row.get(1)?,
        raw_value: row.get(2)?,
    })
}

fn newspaper_from_row(row: &Row<'_>) -> rusqlite::Result<Newspaper> {
    Ok(Newspaper {
        id: row.get(0)?,
        paper_identifier: row.get(1)?,
        start_year: row.get(2)?,
        end_year: row.get(3)?,
        compressed_folder_path: row.get::<_, Option<String>>(4)?.map(PathBuf::from),
        uncompressed_folder_path: row.get::<_, Option<String>>(5)?.map(PathBuf::from),
        external_newspaper_id: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn archive_from_row(row: &Row<'_>) -> rusqlite::Result<Archive> {
    Ok(Archive {
        id: row.get(0)?,
        newspaper_id: row.get(1)?,
        archive_identifier: row.get(2)?,
        compressed_file_path: row.get::<_, Option<String>>(3)?.map(PathBuf::from),
        uncompressed_folder_path: row.get::<_, Option<String>>(4)?.map(PathBuf::from),
        start_date: row.get::<_, Option<String>>(5)?.and_then(|s| parse_date(&s)),
        end_date: row.get::<_, Option<String>>(6)?.and_then(|s| parse_date(&s)),
        notes: row.get(7)?,
    })
}

fn paper_count_from_row(row: &Row<'_>) -> rusqlite::Result<PaperObjectTypeCount> {
    Ok(PaperObjectTypeCount {
        id: row.get(0)?,
        newspaper_id: row.get(1)?,
        object_type_id: row.get(2)?,
        item_count: row.get(3)?,
    })
}

fn archive_count_from_row(row: &Row<'_>) -> rusqlite::Result<ArchiveObjectTypeCount> {
    Ok(ArchiveObjectTypeCount {
        id: row.get(0)?,
        archive_id: row.get(1)?,
        object_type_id: row.get(2)?,
        item_count: row.get(3)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Object type operations

    fn create_object_type(&self, object_type: &NewObjectType) -> Result<ObjectType> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO object_types (raw_value, slug, name, description, parent_type_id, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                object_type.raw_value,
                object_type.slug,
                object_type.name,
                object_type.description,
                object_type.parent_type_id,
                format_datetime(&now),
            ],
        )
        .map_err(|e| {
            map_insert_error(e, || {
                format!(
                    "object type with raw value {:?} already exists",
                    object_type.raw_value
                )
            })
        })?;

        Ok(ObjectType {
            id: conn.last_insert_rowid(),
            raw_value: object_type.raw_value.clone(),
            slug: object_type.slug.clone(),
            name: object_type.name.clone(),
            description: object_type.description.clone(),
            parent_type_id: object_type.parent_type_id,
            last_modified: now,
        })
    }

    fn get_object_type(&self, id: i64) -> Result<Option<ObjectType>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {OBJECT_TYPE_COLUMNS} FROM object_types WHERE id = ?1"),
            params![id],
            object_type_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn find_object_types_by_raw_value(&self, raw_value: &str) -> Result<Vec<ObjectType>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {OBJECT_TYPE_COLUMNS} FROM object_types WHERE raw_value = ?1 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![raw_value], object_type_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_object_types(&self) -> Result<Vec<ObjectType>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {OBJECT_TYPE_COLUMNS} FROM object_types ORDER BY raw_value, id"
        ))?;

        let rows = stmt.query_map([], object_type_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_object_type(&self, object_type: &ObjectType) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE object_types
                 SET raw_value = ?1, slug = ?2, name = ?3, description = ?4, parent_type_id = ?5, last_modified = ?6
                 WHERE id = ?7",
                params![
                    object_type.raw_value,
                    object_type.slug,
                    object_type.name,
                    object_type.description,
                    object_type.parent_type_id,
                    format_datetime(&Utc::now()),
                    object_type.id,
                ],
            )
            .map_err(|e| {
                map_insert_error(e, || {
                    format!(
                        "object type with raw value {:?} already exists",
                        object_type.raw_value
                    )
                })
            })?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Synonym operations

    fn create_object_type_raw_value(
        &self,
        object_type_id: i64,
        raw_value: &str,
    ) -> Result<ObjectTypeRawValue> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO object_type_raw_values (object_type_id, raw_value) VALUES (?1, ?2)",
            params![object_type_id, raw_value],
        )?;

        Ok(ObjectTypeRawValue {
            id: conn.last_insert_rowid(),
            object_type_id,
            raw_value: raw_value.to_string(),
        })
    }

    fn count_object_type_raw_values(&self, object_type_id: i64, raw_value: &str) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM object_type_raw_values WHERE object_type_id = ?1 AND raw_value = ?2",
            params![object_type_id, raw_value],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn find_raw_value_owners(&self, raw_value: &str) -> Result<Vec<i64>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT object_type_id FROM object_type_raw_values
             WHERE raw_value = ?1 ORDER BY object_type_id",
        )?;

        let rows = stmt.query_map(params![raw_value], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_object_type_raw_values(&self, object_type_id: i64) -> Result<Vec<ObjectTypeRawValue>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, object_type_id, raw_value FROM object_type_raw_values
             WHERE object_type_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![object_type_id], raw_value_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Newspaper operations

    fn create_newspaper(&self, newspaper: &NewNewspaper) -> Result<Newspaper> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO newspapers (paper_identifier, start_year, end_year, compressed_folder_path, uncompressed_folder_path, external_newspaper_id, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                newspaper.paper_identifier,
                newspaper.start_year,
                newspaper.end_year,
                newspaper.compressed_folder_path.as_deref().map(path_to_sql),
                newspaper.uncompressed_folder_path.as_deref().map(path_to_sql),
                newspaper.external_newspaper_id,
                newspaper.notes,
            ],
        )
        .map_err(|e| {
            map_insert_error(e, || {
                format!("newspaper '{}' already exists", newspaper.paper_identifier)
            })
        })?;

        Ok(Newspaper {
            id: conn.last_insert_rowid(),
            paper_identifier: newspaper.paper_identifier.clone(),
            start_year: newspaper.start_year,
            end_year: newspaper.end_year,
            compressed_folder_path: newspaper.compressed_folder_path.clone(),
            uncompressed_folder_path: newspaper.uncompressed_folder_path.clone(),
            external_newspaper_id: newspaper.external_newspaper_id,
            notes: newspaper.notes.clone(),
        })
    }

    fn find_newspapers_by_identifier(&self, paper_identifier: &str) -> Result<Vec<Newspaper>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NEWSPAPER_COLUMNS} FROM newspapers WHERE paper_identifier = ?1 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![paper_identifier], newspaper_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_newspapers(&self) -> Result<Vec<Newspaper>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NEWSPAPER_COLUMNS} FROM newspapers ORDER BY paper_identifier"
        ))?;

        let rows = stmt.query_map([], newspaper_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Archive operations

    fn create_archive(&self, archive: &NewArchive) -> Result<Archive> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO archives (newspaper_id, archive_identifier, compressed_file_path, uncompressed_folder_path, start_date, end_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                archive.newspaper_id,
                archive.archive_identifier,
                archive.compressed_file_path.as_deref().map(path_to_sql),
                archive.uncompressed_folder_path.as_deref().map(path_to_sql),
                archive.start_date.as_ref().map(format_date),
                archive.end_date.as_ref().map(format_date),
                archive.notes,
            ],
        )
        .map_err(|e| {
            map_insert_error(e, || {
                format!(
                    "archive '{}' already exists or violates its date range",
                    archive.archive_identifier
                )
            })
        })?;

        Ok(Archive {
            id: conn.last_insert_rowid(),
            newspaper_id: archive.newspaper_id,
            archive_identifier: archive.archive_identifier.clone(),
            compressed_file_path: archive.compressed_file_path.clone(),
            uncompressed_folder_path: archive.uncompressed_folder_path.clone(),
            start_date: archive.start_date,
            end_date: archive.end_date,
            notes: archive.notes.clone(),
        })
    }

    fn find_archives(&self, newspaper_id: i64, archive_identifier: &str) -> Result<Vec<Archive>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARCHIVE_COLUMNS} FROM archives
             WHERE newspaper_id = ?1 AND archive_identifier = ?2 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![newspaper_id, archive_identifier], archive_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_archives(&self, newspaper_id: i64) -> Result<Vec<Archive>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARCHIVE_COLUMNS} FROM archives WHERE newspaper_id = ?1 ORDER BY archive_identifier"
        ))?;

        let rows = stmt.query_map(params![newspaper_id], archive_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_archive_dates(
        &self,
        id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE archives SET start_date = ?1, end_date = ?2 WHERE id = ?3",
                params![
                    start_date.as_ref().map(format_date),
                    end_date.as_ref().map(format_date),
                    id
                ],
            )
            .map_err(|e| map_insert_error(e, || format!("archive {id} date range is inverted")))?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Newspaper-level counts

    fn create_paper_type_count(
        &self,
        newspaper_id: i64,
        object_type_id: i64,
        item_count: i64,
    ) -> Result<PaperObjectTypeCount> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO newspaper_object_types (newspaper_id, object_type_id, item_count)
             VALUES (?1, ?2, ?3)",
            params![newspaper_id, object_type_id, item_count],
        )
        .map_err(|e| {
            map_insert_error(e, || {
                format!("newspaper {newspaper_id} already has a count for type {object_type_id}")
            })
        })?;

        Ok(PaperObjectTypeCount {
            id: conn.last_insert_rowid(),
            newspaper_id,
            object_type_id,
            item_count,
        })
    }

    fn find_paper_type_counts(
        &self,
        newspaper_id: i64,
        object_type_id: i64,
    ) -> Result<Vec<PaperObjectTypeCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, newspaper_id, object_type_id, item_count FROM newspaper_object_types
             WHERE newspaper_id = ?1 AND object_type_id = ?2 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![newspaper_id, object_type_id], paper_count_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_paper_type_counts(&self, newspaper_id: i64) -> Result<Vec<PaperObjectTypeCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, newspaper_id, object_type_id, item_count FROM newspaper_object_types
             WHERE newspaper_id = ?1 ORDER BY object_type_id",
        )?;

        let rows = stmt.query_map(params![newspaper_id], paper_count_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_paper_type_count(&self, id: i64, item_count: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE newspaper_object_types SET item_count = ?1 WHERE id = ?2",
            params![item_count, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Archive-level counts

    fn create_archive_type_count(
        &self,
        archive_id: i64,
        object_type_id: i64,
        item_count: i64,
    ) -> Result<ArchiveObjectTypeCount> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO archive_object_types (archive_id, object_type_id, item_count)
             VALUES (?1, ?2, ?3)",
            params![archive_id, object_type_id, item_count],
        )
        .map_err(|e| {
            map_insert_error(e, || {
                format!("archive {archive_id} already has a count for type {object_type_id}")
            })
        })?;

        Ok(ArchiveObjectTypeCount {
            id: conn.last_insert_rowid(),
            archive_id,
            object_type_id,
            item_count,
        })
    }

    fn find_archive_type_counts(
        &self,
        archive_id: i64,
        object_type_id: i64,
    ) -> Result<Vec<ArchiveObjectTypeCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, archive_id, object_type_id, item_count FROM archive_object_types
             WHERE archive_id = ?1 AND object_type_id = ?2 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![archive_id, object_type_id], archive_count_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_archive_type_counts(&self, archive_id: i64) -> Result<Vec<ArchiveObjectTypeCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, archive_id, object_type_id, item_count FROM archive_object_types
             WHERE archive_id = ?1 ORDER BY object_type_id",
        )?;

        let rows = stmt.query_map(params![archive_id], archive_count_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_archive_type_count(&self, id: i64, item_count: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE archive_object_types SET item_count = ?1 WHERE id = ?2",
            params![item_count, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn count_rows(&self) -> Result<StoreCounts> {
        let conn = self.conn();
        let count = |table: &str| -> Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(Error::from)
        };

        Ok(StoreCounts {
            object_types: count("object_types")?,
            object_type_raw_values: count("object_type_raw_values")?,
            newspapers: count("newspapers")?,
            archives: count("archives")?,
            newspaper_object_types: count("newspaper_object_types")?,
            archive_object_types: count("archive_object_types")?,
        })
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn test_newspaper(store: &SqliteStore, identifier: &str) -> Newspaper {
        store
            .create_newspaper(&NewNewspaper {
                paper_identifier: identifier.to_string(),
                start_year: 1900,
                end_year: 1950,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = test_store();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"object_types".to_string()));
        assert!(tables.contains(&"object_type_raw_values".to_string()));
        assert!(tables.contains(&"newspapers".to_string()));
        assert!(tables.contains(&"archives".to_string()));
        assert!(tables.contains(&"newspaper_object_types".to_string()));
        assert!(tables.contains(&"archive_object_types".to_string()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_temp, store) = test_store();
        test_newspaper(&store, "WashPost");

        store.initialize().unwrap();
        assert_eq!(store.count_rows().unwrap().newspapers, 1);
    }

    #[test]
    fn test_object_type_crud() {
        let (_temp, store) = test_store();

        let created = store
            .create_object_type(&NewObjectType {
                raw_value: Some("Front Page".to_string()),
                slug: Some("front-page".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(created.id > 0);

        let fetched = store.get_object_type(created.id).unwrap().unwrap();
        assert_eq!(fetched.raw_value.as_deref(), Some("Front Page"));
        assert_eq!(fetched.slug.as_deref(), Some("front-page"));

        let found = store.find_object_types_by_raw_value("Front Page").unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.find_object_types_by_raw_value("front page").unwrap().is_empty());

        let mut updated = fetched.clone();
        updated.name = Some("Front page".to_string());
        store.update_object_type(&updated).unwrap();
        let fetched = store.get_object_type(created.id).unwrap().unwrap();
        assert_eq!(fetched.name.as_deref(), Some("Front page"));
    }

    #[test]
    fn test_object_type_raw_value_is_unique() {
        let (_temp, store) = test_store();
        let new = NewObjectType {
            raw_value: Some("Article".to_string()),
            ..Default::default()
        };

        store.create_object_type(&new).unwrap();
        let err = store.create_object_type(&new).unwrap_err();
        assert!(err.is_integrity_conflict());
    }

    #[test]
    fn test_list_object_types_ordered_by_raw_value() {
        let (_temp, store) = test_store();
        for raw in ["Obituary", "Advertisement", "Editorial"] {
            store
                .create_object_type(&NewObjectType {
                    raw_value: Some(raw.to_string()),
                    ..Default::default()
                })
                .unwrap();
        }

        let raws: Vec<_> = store
            .list_object_types()
            .unwrap()
            .into_iter()
            .filter_map(|t| t.raw_value)
            .collect();
        assert_eq!(raws, vec!["Advertisement", "Editorial", "Obituary"]);
    }

    #[test]
    fn test_raw_values() {
        let (_temp, store) = test_store();
        let ad = store
            .create_object_type(&NewObjectType {
                raw_value: Some("Advertisement".to_string()),
                ..Default::default()
            })
            .unwrap();

        store.create_object_type_raw_value(ad.id, "Advertisement").unwrap();
        store.create_object_type_raw_value(ad.id, "Advert").unwrap();

        assert_eq!(store.count_object_type_raw_values(ad.id, "Advert").unwrap(), 1);
        assert_eq!(store.count_object_type_raw_values(ad.id, "advert").unwrap(), 0);
        assert_eq!(store.find_raw_value_owners("Advert").unwrap(), vec![ad.id]);
        assert!(store.find_raw_value_owners("Article").unwrap().is_empty());

        let listed = store.list_object_type_raw_values(ad.id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].raw_value, "Advert");
    }

    #[test]
    fn test_newspaper_crud() {
        let (_temp, store) = test_store();

        let created = store
            .create_newspaper(&NewNewspaper {
                paper_identifier: "ChicagoDefender".to_string(),
                start_year: 1910,
                end_year: 1975,
                compressed_folder_path: Some(PathBuf::from("/zip/ChicagoDefender")),
                uncompressed_folder_path: Some(PathBuf::from("/xml/ChicagoDefender")),
                external_newspaper_id: Some(7),
                notes: None,
            })
            .unwrap();

        let found = store.find_newspapers_by_identifier("ChicagoDefender").unwrap();
        assert_eq!(found, vec![created.clone()]);
        assert_eq!(
            found[0].uncompressed_folder_path,
            Some(PathBuf::from("/xml/ChicagoDefender"))
        );

        let err = store
            .create_newspaper(&NewNewspaper {
                paper_identifier: "ChicagoDefender".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_integrity_conflict());

        assert_eq!(store.list_newspapers().unwrap().len(), 1);
    }

    #[test]
    fn test_archive_crud_and_dates() {
        let (_temp, store) = test_store();
        let paper = test_newspaper(&store, "LATimes");

        let archive = store
            .create_archive(&NewArchive {
                newspaper_id: paper.id,
                archive_identifier: "LATimes_1925_01".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(archive.start_date.is_none());

        let start = NaiveDate::from_ymd_opt(1925, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(1925, 1, 31).unwrap();
        store
            .update_archive_dates(archive.id, Some(start), Some(end))
            .unwrap();

        let found = store.find_archives(paper.id, "LATimes_1925_01").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_date, Some(start));
        assert_eq!(found[0].end_date, Some(end));

        let err = store
            .update_archive_dates(archive.id, Some(end), Some(start))
            .unwrap_err();
        assert!(err.is_integrity_conflict());

        assert!(matches!(
            store.update_archive_dates(9999, None, None),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_archive_identifier_is_globally_unique() {
        let (_temp, store) = test_store();
        let first = test_newspaper(&store, "PaperA");
        let second = test_newspaper(&store, "PaperB");

        let new = NewArchive {
            newspaper_id: first.id,
            archive_identifier: "Shared_01".to_string(),
            ..Default::default()
        };
        store.create_archive(&new).unwrap();

        let err = store
            .create_archive(&NewArchive {
                newspaper_id: second.id,
                ..new
            })
            .unwrap_err();
        assert!(err.is_integrity_conflict());
        assert!(store.find_archives(second.id, "Shared_01").unwrap().is_empty());
    }

    #[test]
    fn test_type_counts() {
        let (_temp, store) = test_store();
        let paper = test_newspaper(&store, "NYT");
        let archive = store
            .create_archive(&NewArchive {
                newspaper_id: paper.id,
                archive_identifier: "NYT_01".to_string(),
                ..Default::default()
            })
            .unwrap();
        let article = store
            .create_object_type(&NewObjectType {
                raw_value: Some("Article".to_string()),
                ..Default::default()
            })
            .unwrap();

        let paper_count = store.create_paper_type_count(paper.id, article.id, 12).unwrap();
        let archive_count = store
            .create_archive_type_count(archive.id, article.id, 5)
            .unwrap();

        assert!(
            store
                .create_paper_type_count(paper.id, article.id, 1)
                .unwrap_err()
                .is_integrity_conflict()
        );

        store.update_paper_type_count(paper_count.id, 13).unwrap();
        store.update_archive_type_count(archive_count.id, 6).unwrap();

        let paper_counts = store.find_paper_type_counts(paper.id, article.id).unwrap();
        assert_eq!(paper_counts[0].item_count, 13);
        let archive_counts = store.list_archive_type_counts(archive.id).unwrap();
        assert_eq!(archive_counts[0].item_count, 6);

        let counts = store.count_rows().unwrap();
        assert_eq!(counts.newspaper_object_types, 1);
        assert_eq!(counts.archive_object_types, 1);
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        test_newspaper(&store, "InMemory");
        assert_eq!(store.list_newspapers().unwrap().len(), 1);
    }
}
