//! `collector classify` and `collector save`.

use anyhow::{Context, Result};
use collector::{Collector, JsonFileCollectionStore, PageSource, Selection};
use colored::Colorize;

use crate::config::Config;

pub fn classify(text: &str) -> Result<()> {
    let classification = collector::classify(text);
    println!(
        "{} (suggested collection: {})",
        classification.kind.to_string().bold(),
        classification.suggested_label
    );
    Ok(())
}

pub async fn save(
    config: &Config,
    text: String,
    collection: Option<&str>,
    source: PageSource,
) -> Result<()> {
    let collector = Collector::new(JsonFileCollectionStore::new(config.collections_path()));
    let saved = collector
        .save_selection(Selection::new(text), source, collection)
        .await
        .context("Failed to save selection")?;

    let verb = if saved.created_collection {
        "Created collection and saved"
    } else {
        "Saved"
    };
    println!(
        "{} {} {} item to \"{}\"",
        "✓".green(),
        verb,
        saved.item.item_type,
        saved.collection_name
    );

    for issue in &saved.item.validation.issues {
        println!("  {} {}", "warning:".yellow(), issue);
    }
    Ok(())
}
