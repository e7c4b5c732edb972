//! `collector collections` - list, show, move, export, and delete.

use anyhow::{bail, Context, Result};
use collector::{
    apply_mapping, auto_map, render_template, CollectionStore, JsonFileCollectionStore,
    RecordTable,
};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;

pub async fn list(config: &Config) -> Result<()> {
    let store = JsonFileCollectionStore::new(config.collections_path());
    let collections = store.get_all().await.context("Failed to load collections")?;

    if collections.is_empty() {
        println!("{}", "No collections yet.".yellow());
        return Ok(());
    }

    for collection in collections {
        println!(
            "{}  {} ({} item{})",
            collection.id.dimmed(),
            collection.name.bold(),
            collection.len(),
            if collection.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

pub async fn show(config: &Config, id: &str) -> Result<()> {
    let store = JsonFileCollectionStore::new(config.collections_path());
    let Some(collection) = store.get_by_id(id).await.context("Failed to load collection")? else {
        bail!("Collection not found: {}", id);
    };

    println!(
        "{} - created {}",
        collection.name.bold(),
        collection.created.format("%Y-%m-%d %H:%M")
    );

    for item in &collection.items {
        println!();
        println!(
            "{} {} {}",
            format!("[{}]", item.item_type).cyan(),
            item.timestamp.format("%Y-%m-%d %H:%M"),
            item.source.url.as_deref().unwrap_or("").dimmed()
        );
        if let Some(content) = item.content() {
            println!("{}", content);
        }
        for issue in &item.validation.issues {
            println!("  {} {}", "warning:".yellow(), issue);
        }
    }
    Ok(())
}

pub async fn delete(config: &Config, id: &str) -> Result<()> {
    let store = JsonFileCollectionStore::new(config.collections_path());
    if store.get_by_id(id).await?.is_none() {
        bail!("Collection not found: {}", id);
    }

    store.delete(id).await.context("Failed to delete collection")?;
    println!("{} Deleted collection {}", "✓".green(), id);
    Ok(())
}

pub async fn move_item(config: &Config, item_id: &str, from: &str, to: &str) -> Result<()> {
    let store = JsonFileCollectionStore::new(config.collections_path());
    store
        .move_item(item_id, from, to)
        .await
        .with_context(|| format!("Failed to move item {}", item_id))?;
    println!("{} Moved item {}", "✓".green(), item_id);
    Ok(())
}

pub async fn export(
    config: &Config,
    id: &str,
    columns: &[String],
    template: Option<&Path>,
) -> Result<()> {
    let store = JsonFileCollectionStore::new(config.collections_path());
    let Some(collection) = store.get_by_id(id).await.context("Failed to load collection")? else {
        bail!("Collection not found: {}", id);
    };

    if let Some(path) = template {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let documents: Vec<String> = collection
            .items
            .iter()
            .map(|item| render_template(&template, item))
            .collect();
        println!("{}", documents.join("\n"));
        return Ok(());
    }

    let mapping = auto_map(&collection.items, columns);
    if mapping.is_empty() {
        eprintln!("{}", "No item fields match those columns.".yellow());
        return Ok(());
    }
    for (source, target) in mapping.iter() {
        tracing::debug!(field = source, column = target, "Mapped field");
    }

    let records = apply_mapping(&collection.items, &mapping);
    println!("{}", RecordTable::from_records(&records).to_tsv());
    Ok(())
}
