use serde::Serialize;

use crate::registry::ObjectTypeRegistry;
use crate::store::Store;

use super::init_store;

#[derive(Serialize)]
struct ObjectTypeOutput {
    id: i64,
    raw_value: Option<String>,
    slug: Option<String>,
    parent_type_id: Option<i64>,
    synonyms: Vec<String>,
}

pub fn run_types_list(data_dir: String, json: bool) -> anyhow::Result<()> {
    let (_, store) = init_store(&data_dir)?;

    let types = store
        .list_object_types()?
        .into_iter()
        .map(|t| {
            let synonyms = store
                .list_object_type_raw_values(t.id)?
                .into_iter()
                .map(|r| r.raw_value)
                .filter(|raw| Some(raw) != t.raw_value.as_ref())
                .collect();
            Ok(ObjectTypeOutput {
                id: t.id,
                raw_value: t.raw_value,
                slug: t.slug,
                parent_type_id: t.parent_type_id,
                synonyms,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    if types.is_empty() {
        println!("No object types recorded.");
        return Ok(());
    }

    println!();
    for t in &types {
        println!(
            "  {:>4}  {:<32} {}",
            t.id,
            t.raw_value.as_deref().unwrap_or("-"),
            t.slug.as_deref().unwrap_or("-")
        );
        if !t.synonyms.is_empty() {
            println!("        also: {}", t.synonyms.join(", "));
        }
    }
    println!();

    Ok(())
}

pub fn run_types_alias(data_dir: String, label: String, canonical: String) -> anyhow::Result<()> {
    let (_, store) = init_store(&data_dir)?;
    let mut registry = ObjectTypeRegistry::new(&store);

    let object_type = registry.alias(&label, &canonical).map_err(|e| match e {
        crate::error::Error::NotFound => anyhow::anyhow!("Object type not found: {canonical}"),
        other => other.into(),
    })?;

    println!();
    println!("Recorded '{label}' as a synonym of {object_type}");
    println!();

    Ok(())
}
