use std::fs;
use std::path::PathBuf;

use crate::config::IngestConfig;
use crate::store::{SqliteStore, Store};

/// Create the database and write `newsroll.toml`. Re-running keeps existing
/// data and only updates the settings that were passed.
pub fn run_init(
    data_dir: String,
    source_root: Option<PathBuf>,
    destination_root: Option<PathBuf>,
    refresh_counts: bool,
) -> anyhow::Result<()> {
    let mut config = IngestConfig::load(&data_dir)?;
    fs::create_dir_all(&config.data_dir)?;

    let db_path = config.db_path();
    let existed = db_path.exists();
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    if source_root.is_some() {
        config.source_root = source_root;
    }
    if destination_root.is_some() {
        config.destination_root = destination_root;
    }
    if refresh_counts {
        config.refresh_counts = true;
    }
    config.save()?;

    println!();
    if existed {
        println!("Database already exists at {}", db_path.display());
    } else {
        println!("Created database at {}", db_path.display());
    }
    println!("Configuration written to {}", config.config_path().display());
    println!();

    Ok(())
}
