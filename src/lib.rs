//! # Newsroll
//!
//! Batch ingestion of decompressed historical newspaper archives into
//! per-paper and per-archive object type statistics.
//!
//! Each newspaper has a decompressed root holding one folder per archive,
//! and each archive folder holds one XML file per article. Processing a
//! paper scans every archive, resolves the raw `ObjectType` labels against
//! a shared taxonomy, and records counts and date ranges.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! newsroll = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use newsroll::aggregate::PaperAggregator;
//! use newsroll::config::IngestConfig;
//! use newsroll::store::{SqliteStore, Store};
//!
//! let config = IngestConfig::load("./data")?;
//! let store = SqliteStore::new(config.db_path())?;
//! store.initialize()?;
//!
//! let mut aggregator = PaperAggregator::new(&store, config.count_policy());
//! for paper in store.list_newspapers()? {
//!     let summary = aggregator.process_newspaper(&paper)?;
//!     println!("{}: {} articles", paper.paper_identifier, summary.article_count());
//!     aggregator.reset_cache();
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod aggregate;
pub mod binder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod scanner;
pub mod store;
pub mod types;
