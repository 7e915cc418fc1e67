mod archive;
mod commands;
mod info;
mod init;
mod paper;
mod types;

pub use archive::{run_archive_map_types, run_archive_scan};
pub use commands::{ArchiveCommands, PaperCommands, TypesCommands};
pub use info::run_info;
pub use init::run_init;
pub use paper::{run_paper_add, run_paper_list, run_paper_process};
pub use types::{run_types_alias, run_types_list};

use crate::config::IngestConfig;
use crate::store::SqliteStore;

/// Open the store in an initialized data directory.
pub fn init_store(data_dir: &str) -> anyhow::Result<(IngestConfig, SqliteStore)> {
    let config = IngestConfig::load(data_dir)?;
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'newsroll init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    Ok((config, store))
}
