use std::path::PathBuf;

use serde::Serialize;

use crate::aggregate::{PaperAggregator, PaperSummary};
use crate::binder::PersistenceBinder;
use crate::config::CountPolicy;
use crate::store::Store;
use crate::types::{NewNewspaper, Newspaper};

use super::init_store;

#[derive(Serialize)]
struct NewspaperOutput {
    #[serde(flatten)]
    newspaper: Newspaper,
    archives: usize,
}

#[allow(clippy::too_many_arguments)]
pub fn run_paper_add(
    data_dir: String,
    identifier: String,
    start_year: i32,
    end_year: i32,
    compressed_path: Option<PathBuf>,
    uncompressed_path: Option<PathBuf>,
    external_id: Option<i64>,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let (config, store) = init_store(&data_dir)?;
    let binder = PersistenceBinder::new(&store, config.count_policy());

    let new = NewNewspaper {
        compressed_folder_path: compressed_path
            .or_else(|| config.paper_source_path(&identifier)),
        uncompressed_folder_path: uncompressed_path
            .or_else(|| config.paper_destination_path(&identifier)),
        paper_identifier: identifier,
        start_year,
        end_year,
        external_newspaper_id: external_id,
        notes,
    };

    let fetched = binder.register_newspaper(&new)?;
    let created = fetched.was_created();
    let newspaper = fetched.into_inner();

    println!();
    if created {
        println!("Created newspaper {newspaper}");
    } else {
        println!("Newspaper already registered: {newspaper}");
    }
    println!();

    Ok(())
}

pub fn run_paper_list(data_dir: String, json: bool) -> anyhow::Result<()> {
    let (_, store) = init_store(&data_dir)?;

    let newspapers = store
        .list_newspapers()?
        .into_iter()
        .map(|newspaper| {
            let archives = store.list_archives(newspaper.id)?.len();
            Ok(NewspaperOutput {
                newspaper,
                archives,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&newspapers)?);
        return Ok(());
    }

    if newspapers.is_empty() {
        println!("No newspapers registered.");
        return Ok(());
    }

    println!();
    for entry in &newspapers {
        println!("  {} ({} archives)", entry.newspaper, entry.archives);
    }
    println!();

    Ok(())
}

pub fn run_paper_process(
    data_dir: String,
    identifier: String,
    refresh_counts: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (config, store) = init_store(&data_dir)?;

    let mut found = store.find_newspapers_by_identifier(&identifier)?;
    let newspaper = match found.len() {
        0 => anyhow::bail!(
            "Newspaper not found: {identifier}. Register it with 'newsroll paper add'."
        ),
        1 => found.remove(0),
        n => anyhow::bail!("{n} newspapers share the identifier {identifier}"),
    };

    let policy = if refresh_counts {
        CountPolicy::Refresh
    } else {
        config.count_policy()
    };

    let mut aggregator = PaperAggregator::new(&store, policy);
    let summary = aggregator.process_newspaper(&newspaper)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &PaperSummary) {
    println!();
    println!(
        "Processed {}: {} archives, {} articles",
        summary.paper_identifier,
        summary.archives.len(),
        summary.article_count()
    );
    println!();

    for (label, count) in &summary.label_counts {
        println!("  {count:>8}  {label}");
    }

    let skipped_files: usize = summary.archives.iter().map(|a| a.stats.failures.len()).sum();
    if skipped_files > 0 {
        println!();
        println!("Skipped {skipped_files} unreadable article files");
    }

    for failed in &summary.failed_archives {
        println!("Failed to scan {}: {}", failed.archive_identifier, failed.reason);
    }
    for archive in &summary.archives {
        if let Some(reason) = &archive.bind_error {
            println!("Failed to record {}: {reason}", archive.archive_identifier);
        }
    }
    for failed in &summary.report.failed {
        println!("Failed to record label '{}': {}", failed.label, failed.reason);
    }
    println!();
}
