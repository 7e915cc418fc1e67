mod ingest;

pub use ingest::{CountPolicy, IngestConfig};
