//! `collector key` - API key storage.

use anyhow::{bail, Context, Result};
use collector::{CredentialStore, FileCredentialStore, SecretString};
use colored::Colorize;

use crate::config::Config;

pub async fn set(config: &Config, key: &str) -> Result<()> {
    let secret = SecretString::new(key);
    if secret.is_blank() {
        bail!("API key must not be empty");
    }

    let store = FileCredentialStore::new(config.credentials_path());
    store
        .set_credential(secret.clone())
        .await
        .context("Failed to save API key")?;

    println!("{} API key saved ({})", "✓".green(), secret.masked());
    Ok(())
}

pub async fn show(config: &Config) -> Result<()> {
    let store = FileCredentialStore::new(config.credentials_path());
    match store
        .get_credential()
        .await
        .context("Failed to read API key")?
    {
        Some(key) => println!("{}", key.masked()),
        None => println!("{}", "No API key set. Run `collector key set <KEY>`.".yellow()),
    }
    Ok(())
}
