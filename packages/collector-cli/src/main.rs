//! `collector` - capture page text and run AI extraction from the terminal.

mod cmd;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Collect web content into collections and extract structured data with AI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the Google AI API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Detect what kind of data a piece of text is
    Classify { text: String },

    /// Extract structured data from page text (read from --file or stdin)
    Extract {
        /// What to extract, in plain language
        #[arg(long, short)]
        query: String,

        /// Read page text from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Print records as tab-separated values with a header line
        #[arg(long, conflicts_with = "json")]
        tsv: bool,

        /// Save the records as one item
        #[arg(long)]
        save: bool,

        /// Collection to save into (created if missing); defaults to "AI Extractions"
        #[arg(long)]
        collection: Option<String>,

        /// Page URL recorded with the saved item
        #[arg(long)]
        url: Option<String>,

        /// Page title recorded with the saved item
        #[arg(long)]
        title: Option<String>,
    },

    /// Pull one structured object (contact, article, meeting, ...) out of a text
    Structure {
        /// Text to structure; read from --file or stdin when omitted
        text: Option<String>,

        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Save a text selection into a collection
    Save {
        text: String,

        /// Collection name; defaults to the detected kind's suggestion
        #[arg(long)]
        collection: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },

    /// Browse and manage collections
    Collections {
        #[command(subcommand)]
        command: CollectionCommands,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Store the API key
    Set { key: String },
    /// Show the stored key, masked
    Show,
}

#[derive(Subcommand)]
enum CollectionCommands {
    /// List all collections
    List,
    /// Show the items in a collection
    Show { id: String },
    /// Delete a collection
    Delete { id: String },
    /// Move an item from one collection to another
    Move {
        item_id: String,
        from: String,
        to: String,
    },
    /// Export a collection as TSV columns or as one document per item
    Export {
        id: String,

        /// Target columns, comma-separated; item fields are matched by name
        #[arg(long, value_delimiter = ',', required_unless_present = "template")]
        columns: Vec<String>,

        /// Template file with {field} placeholders
        #[arg(long, conflicts_with = "columns")]
        template: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,collector=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Key { command } => match command {
            KeyCommands::Set { key } => cmd::key::set(&config, &key).await,
            KeyCommands::Show => cmd::key::show(&config).await,
        },
        Commands::Classify { text } => cmd::capture::classify(&text),
        Commands::Extract {
            query,
            file,
            json,
            tsv,
            save,
            collection,
            url,
            title,
        } => {
            let args = cmd::extract::ExtractArgs {
                query,
                file,
                json,
                tsv,
                save,
                collection,
                source: cmd::page_source(url, title),
            };
            cmd::extract::run(&config, args).await
        }
        Commands::Structure { text, file } => cmd::extract::structure(&config, text, file).await,
        Commands::Save {
            text,
            collection,
            url,
            title,
        } => {
            cmd::capture::save(&config, text, collection.as_deref(), cmd::page_source(url, title))
                .await
        }
        Commands::Collections { command } => match command {
            CollectionCommands::List => cmd::collections::list(&config).await,
            CollectionCommands::Show { id } => cmd::collections::show(&config, &id).await,
            CollectionCommands::Delete { id } => cmd::collections::delete(&config, &id).await,
            CollectionCommands::Move { item_id, from, to } => {
                cmd::collections::move_item(&config, &item_id, &from, &to).await
            }
            CollectionCommands::Export {
                id,
                columns,
                template,
            } => cmd::collections::export(&config, &id, &columns, template.as_deref()).await,
        },
    }
}
