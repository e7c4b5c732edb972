//! `collector extract` - run the extraction pipeline over page text.

use anyhow::{anyhow, Context, Result};
use collector::{
    CollectionStore, Collector, ExtractionRequest, Extractor, FileCredentialStore, GeminiAI,
    JsonFileCollectionStore, PageSource, RecordTable, SaveTarget, Verification,
};
use colored::Colorize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::config::Config;

pub struct ExtractArgs {
    pub query: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub tsv: bool,
    pub save: bool,
    pub collection: Option<String>,
    pub source: PageSource,
}

pub async fn run(config: &Config, args: ExtractArgs) -> Result<()> {
    let text = read_source(args.file.as_ref()).await?;

    let ai = GeminiAI::new(FileCredentialStore::new(config.credentials_path()))
        .with_client(config.gemini_client()?);
    let extractor = Extractor::new(ai);

    let request = ExtractionRequest::new(&text, &args.query, extractor.config())
        .map_err(|e| anyhow!(e.user_message()))?;
    let outcome = extractor.run(&request).await.map_err(|e| {
        tracing::debug!(error = ?e, "Extraction failed");
        anyhow!(e.user_message())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.records)?);
    } else if args.tsv {
        let table = RecordTable::from_records(&outcome.records);
        if !table.is_empty() {
            println!("{}", table.to_tsv());
        }
    } else {
        print_table(&RecordTable::from_records(&outcome.records));
    }

    let status = match outcome.verification {
        Verification::Skipped => "verification skipped".to_string(),
        Verification::Verified => "verified".to_string(),
        Verification::FellBack(kind) => {
            format!("verification failed ({:?}), showing unverified results", kind)
        }
    };
    eprintln!("{} record(s), {}", outcome.records.len(), status.dimmed());

    if args.save {
        if outcome.records.is_empty() {
            eprintln!("{}", "Nothing to save.".yellow());
            return Ok(());
        }

        let store = JsonFileCollectionStore::new(config.collections_path());
        let target = match args.collection.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => match store.find_by_name(name).await? {
                Some(existing) => SaveTarget::Existing(existing.id),
                None => SaveTarget::New(name.to_string()),
            },
            _ => SaveTarget::Default,
        };

        let saved = Collector::new(store)
            .save_extraction(&outcome.records, &request.query, args.source, target)
            .await
            .context("Failed to save extraction")?;
        eprintln!(
            "{} Saved {} record(s) to \"{}\"",
            "✓".green(),
            outcome.records.len(),
            saved.collection_name
        );
    }

    Ok(())
}

pub async fn structure(config: &Config, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => read_source(file.as_ref()).await?,
    };

    let ai = GeminiAI::new(FileCredentialStore::new(config.credentials_path()))
        .with_client(config.gemini_client()?);
    let record = Extractor::new(ai).structure_text(&text).await.map_err(|e| {
        tracing::debug!(error = ?e, "Structuring failed");
        anyhow!(e.user_message())
    })?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read page text from stdin")?;
            Ok(text)
        }
    }
}

fn print_table(table: &RecordTable) {
    if table.is_empty() {
        println!("{}", "No matching data found.".yellow());
        return;
    }

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            table
                .rows
                .iter()
                .map(|row| display_width(&row[i]))
                .chain(std::iter::once(display_width(column)))
                .max()
                .unwrap_or(0)
                .min(60)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(column, *width))
        .collect();
    println!("{}", header.join(" │ ").bold());

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(&cell.replace('\n', " "), *width))
            .collect();
        println!("{}", cells.join(" │ "));
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Pad or cut `text` to exactly `width` characters.
fn pad(text: &str, width: usize) -> String {
    let len = display_width(text);
    if len > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
