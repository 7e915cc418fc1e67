use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use newsroll::cli::{
    ArchiveCommands, PaperCommands, TypesCommands, run_archive_map_types, run_archive_scan,
    run_info, run_init, run_paper_add, run_paper_list, run_paper_process, run_types_alias,
    run_types_list,
};

#[derive(Parser)]
#[command(name = "newsroll")]
#[command(about = "Object type statistics for historical newspaper archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and configuration file
    Init {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Root folder of the compressed archives, one folder per paper
        #[arg(long)]
        source_root: Option<PathBuf>,

        /// Root folder of the decompressed archives, one folder per paper
        #[arg(long)]
        destination_root: Option<PathBuf>,

        /// Overwrite recorded counts on every run
        #[arg(long)]
        refresh_counts: bool,
    },

    /// Manage newspapers
    Paper {
        #[command(subcommand)]
        command: PaperCommands,
    },

    /// Inspect archive folders
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },

    /// Manage the object type taxonomy
    Types {
        #[command(subcommand)]
        command: TypesCommands,
    },

    /// Show database row counts
    Info {
        /// Data directory for the database and configuration
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsroll=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            data_dir,
            source_root,
            destination_root,
            refresh_counts,
        } => run_init(data_dir, source_root, destination_root, refresh_counts)?,
        Commands::Paper { command } => match command {
            PaperCommands::Add {
                data_dir,
                identifier,
                start_year,
                end_year,
                compressed_path,
                uncompressed_path,
                external_id,
                notes,
            } => run_paper_add(
                data_dir,
                identifier,
                start_year,
                end_year,
                compressed_path,
                uncompressed_path,
                external_id,
                notes,
            )?,
            PaperCommands::List { data_dir, json } => run_paper_list(data_dir, json)?,
            PaperCommands::Process {
                data_dir,
                identifier,
                refresh_counts,
                json,
            } => run_paper_process(data_dir, identifier, refresh_counts, json)?,
        },
        Commands::Archive { command } => match command {
            ArchiveCommands::Scan { dir, json } => run_archive_scan(dir, json)?,
            ArchiveCommands::MapTypes { dir, json } => run_archive_map_types(dir, json)?,
        },
        Commands::Types { command } => match command {
            TypesCommands::List { data_dir, json } => run_types_list(data_dir, json)?,
            TypesCommands::Alias {
                data_dir,
                label,
                canonical,
            } => run_types_alias(data_dir, label, canonical)?,
        },
        Commands::Info { data_dir, json } => run_info(data_dir, json)?,
    }

    Ok(())
}
