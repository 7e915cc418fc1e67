use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum PaperCommands {
    /// Register a newspaper (existing entries are left untouched)
    Add {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Unique paper identifier, e.g. "WaPo"
        #[arg(long)]
        identifier: String,

        /// First year covered by the archive
        #[arg(long)]
        start_year: i32,

        /// Last year covered by the archive
        #[arg(long)]
        end_year: i32,

        /// Folder holding the compressed archive bundles
        /// (defaults to <source_root>/<identifier>)
        #[arg(long)]
        compressed_path: Option<PathBuf>,

        /// Folder holding the decompressed archive folders
        /// (defaults to <destination_root>/<identifier>)
        #[arg(long)]
        uncompressed_path: Option<PathBuf>,

        /// Identifier of the newspaper in an external catalog
        #[arg(long)]
        external_id: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List registered newspapers
    List {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan every archive of a newspaper and record its object type counts
    Process {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Paper identifier to process
        #[arg(long)]
        identifier: String,

        /// Overwrite counts recorded by earlier runs
        #[arg(long)]
        refresh_counts: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ArchiveCommands {
    /// Count object types in one archive folder without touching the database
    Scan {
        /// Decompressed archive folder
        dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the article files of one archive folder grouped by object type
    MapTypes {
        /// Decompressed archive folder
        dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TypesCommands {
    /// List canonical object types
    List {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a label as a synonym of an existing object type
    Alias {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Label as it appears in article files
        #[arg(long)]
        label: String,

        /// Raw value of the canonical object type
        #[arg(long)]
        canonical: String,
    },
}
