use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DB_FILE: &str = "newsroll.db";
const CONFIG_FILE: &str = "newsroll.toml";

/// What to do with an association count row that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountPolicy {
    /// Counts are written once and never refreshed on re-run.
    #[default]
    KeepExisting,
    /// Existing counts are overwritten with freshly computed totals.
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Root holding `<paper_identifier>/<archive_identifier>.zip` bundles.
    pub source_root: Option<PathBuf>,
    /// Root holding `<paper_identifier>/<archive_identifier>/*.xml` folders.
    pub destination_root: Option<PathBuf>,
    pub refresh_counts: bool,
}

impl IngestConfig {
    /// Loads `newsroll.toml` from the data directory. A missing file yields
    /// the defaults.
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let path = data_dir.join(CONFIG_FILE);

        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<IngestConfig>(&content)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => IngestConfig::default(),
            Err(e) => return Err(Error::Io(e)),
        };

        config.data_dir = data_dir;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.config_path(), content)?;
        Ok(())
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn count_policy(&self) -> CountPolicy {
        if self.refresh_counts {
            CountPolicy::Refresh
        } else {
            CountPolicy::KeepExisting
        }
    }

    /// Default compressed folder for a paper, if a source root is configured.
    #[must_use]
    pub fn paper_source_path(&self, paper_identifier: &str) -> Option<PathBuf> {
        self.source_root
            .as_deref()
            .map(|root| root.join(paper_identifier))
    }

    /// Default decompressed folder for a paper, if a destination root is configured.
    #[must_use]
    pub fn paper_destination_path(&self, paper_identifier: &str) -> Option<PathBuf> {
        self.destination_root
            .as_deref()
            .map(|root| root.join(paper_identifier))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            source_root: None,
            destination_root: None,
            refresh_counts: false,
        }
    }
}
