use std::path::PathBuf;

use crate::scanner;
use crate::types::PubDate;

pub fn run_archive_scan(dir: PathBuf, json: bool) -> anyhow::Result<()> {
    let scan = scanner::scan(&dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scan)?);
        return Ok(());
    }

    let format_date =
        |date: Option<PubDate>| date.map_or_else(|| "-".to_string(), |d| d.to_string());

    println!();
    println!("Archive: {}", dir.display());
    println!("Files:   {}", scan.stats.files);
    println!(
        "Dates:   {} to {}",
        format_date(scan.min_date),
        format_date(scan.max_date)
    );
    println!();

    if scan.label_counts.is_empty() {
        println!("  No object types found.");
    }
    for (label, count) in &scan.label_counts {
        println!("  {count:>8}  {label}");
    }

    let stats = &scan.stats;
    println!();
    println!(
        "No Record: {}  No ObjectType: {}  Empty ObjectType: {}  No date: {}  Failed: {}",
        stats.no_record,
        stats.no_object_type,
        stats.no_object_type_value,
        stats.no_pub_date,
        stats.failures.len()
    );
    for failure in &stats.failures {
        println!("  {}: {}", failure.path.display(), failure.reason);
    }
    println!();

    Ok(())
}

pub fn run_archive_map_types(dir: PathBuf, json: bool) -> anyhow::Result<()> {
    let map = scanner::map_files_to_types(&dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if map.is_empty() {
        println!("No object types found.");
        return Ok(());
    }

    for (label, files) in &map {
        println!("{label} ({})", files.len());
        for file in files {
            println!("  {}", file.display());
        }
    }

    Ok(())
}
