pub const SCHEMA: &str = r#"
-- Canonical object type taxonomy (self-referencing through parent_type_id)
CREATE TABLE IF NOT EXISTS object_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_value TEXT UNIQUE,
    slug TEXT,
    name TEXT,
    description TEXT,
    parent_type_id INTEGER REFERENCES object_types(id) ON DELETE SET NULL,
    last_modified TEXT DEFAULT (datetime('now'))
);

-- Every surface form seen for a canonical type. Uniqueness of
-- (object_type_id, raw_value) is enforced by the registry, not here.
CREATE TABLE IF NOT EXISTS object_type_raw_values (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    object_type_id INTEGER NOT NULL REFERENCES object_types(id) ON DELETE CASCADE,
    raw_value TEXT NOT NULL
);

-- One row per newspaper title being ingested
CREATE TABLE IF NOT EXISTS newspapers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    paper_identifier TEXT NOT NULL UNIQUE,
    start_year INTEGER NOT NULL,
    end_year INTEGER NOT NULL,
    compressed_folder_path TEXT,
    uncompressed_folder_path TEXT,

    -- For correlation with an external newspaper record (opaque here)
    external_newspaper_id INTEGER,
    notes TEXT
);

-- One row per compressed bundle / decompressed folder
CREATE TABLE IF NOT EXISTS archives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    newspaper_id INTEGER NOT NULL REFERENCES newspapers(id) ON DELETE CASCADE,
    archive_identifier TEXT NOT NULL UNIQUE,
    compressed_file_path TEXT,
    uncompressed_folder_path TEXT,
    start_date TEXT,  -- YYYY-MM-DD
    end_date TEXT,    -- YYYY-MM-DD
    notes TEXT,

    CHECK (start_date IS NULL OR end_date IS NULL OR start_date <= end_date)
);

-- Article counts per (newspaper, object type)
CREATE TABLE IF NOT EXISTS newspaper_object_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    newspaper_id INTEGER NOT NULL REFERENCES newspapers(id) ON DELETE CASCADE,
    object_type_id INTEGER NOT NULL REFERENCES object_types(id) ON DELETE CASCADE,
    item_count INTEGER NOT NULL,

    UNIQUE(newspaper_id, object_type_id)
);

-- Article counts per (archive, object type)
CREATE TABLE IF NOT EXISTS archive_object_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    archive_id INTEGER NOT NULL REFERENCES archives(id) ON DELETE CASCADE,
    object_type_id INTEGER NOT NULL REFERENCES object_types(id) ON DELETE CASCADE,
    item_count INTEGER NOT NULL,

    UNIQUE(archive_id, object_type_id)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_object_types_parent ON object_types(parent_type_id);
CREATE INDEX IF NOT EXISTS idx_raw_values_type ON object_type_raw_values(object_type_id, raw_value);
CREATE INDEX IF NOT EXISTS idx_raw_values_value ON object_type_raw_values(raw_value);
CREATE INDEX IF NOT EXISTS idx_archives_newspaper ON archives(newspaper_id);
CREATE INDEX IF NOT EXISTS idx_newspaper_object_types_type ON newspaper_object_types(object_type_id);
CREATE INDEX IF NOT EXISTS idx_archive_object_types_type ON archive_object_types(object_type_id);
"#;
