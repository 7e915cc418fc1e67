use crate::store::Store;

use super::init_store;

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let (config, store) = init_store(&data_dir)?;
    let counts = store.count_rows()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!();
    println!("Database: {}", config.db_path().display());
    println!();
    println!("  Newspapers:           {}", counts.newspapers);
    println!("  Archives:             {}", counts.archives);
    println!("  Object types:         {}", counts.object_types);
    println!("  Object type synonyms: {}", counts.object_type_raw_values);
    println!("  Paper counts:         {}", counts.newspaper_object_types);
    println!("  Archive counts:       {}", counts.archive_object_types);
    println!();

    Ok(())
}
