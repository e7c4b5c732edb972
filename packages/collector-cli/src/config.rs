//! Configuration loaded from environment variables.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use gemini_client::GeminiClient;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `collections.json` and `credentials.json`
    pub data_dir: PathBuf,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            data_dir: env::var("COLLECTOR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".collector")),
            gemini_model: non_empty_var("GEMINI_MODEL"),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
            gemini_timeout: non_empty_var("GEMINI_TIMEOUT_SECS")
                .map(|secs| {
                    secs.parse::<u64>()
                        .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?
                .map(Duration::from_secs),
        })
    }

    pub fn collections_path(&self) -> PathBuf {
        self.data_dir.join("collections.json")
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }

    /// Build the Gemini client from the configured overrides.
    pub fn gemini_client(&self) -> Result<GeminiClient> {
        let mut client = GeminiClient::new();
        if let Some(base_url) = &self.gemini_base_url {
            client = client.with_base_url(base_url);
        }
        if let Some(model) = &self.gemini_model {
            client = client.with_model(model);
        }
        if let Some(timeout) = self.gemini_timeout {
            client = client
                .with_timeout(timeout)
                .context("Failed to build Gemini HTTP client")?;
        }
        Ok(client)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
