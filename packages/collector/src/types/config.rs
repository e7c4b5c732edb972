//! Configuration types for generation and extraction.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Sampling settings for a single AI call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature, 0.0 to 1.0. Default: 0.1.
    pub temperature: f32,

    /// Maximum output tokens, must be positive. Default: 1024.
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

impl GenerationOptions {
    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Reject out-of-range settings before anything goes on the wire.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ExtractionError::invalid_request(format!(
                "temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ExtractionError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Source text is cut to this many characters before prompting.
    ///
    /// Default: 100,000.
    pub max_source_chars: usize,

    /// Verification runs only when the source text is strictly longer
    /// than this many characters.
    ///
    /// Default: 15,000.
    pub verify_threshold: usize,

    /// Upper bound on records returned from either stage.
    ///
    /// Default: 50.
    pub max_records: usize,

    /// Sampling for the extraction call. Default: temperature 0.1.
    pub extract_options: GenerationOptions,

    /// Sampling for the verification call. Default: temperature 0.0.
    pub verify_options: GenerationOptions,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_source_chars: 100_000,
            verify_threshold: 15_000,
            max_records: 50,
            extract_options: GenerationOptions::default(),
            verify_options: GenerationOptions::default().with_temperature(0.0),
        }
    }
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the verification threshold.
    pub fn with_verify_threshold(mut self, threshold: usize) -> Self {
        self.verify_threshold = threshold;
        self
    }

    /// Set the source text limit.
    pub fn with_max_source_chars(mut self, max: usize) -> Self {
        self.max_source_chars = max;
        self
    }

    /// Set the record cap.
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    /// Set max tokens for both stages.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.extract_options.max_tokens = max_tokens;
        self.verify_options.max_tokens = max_tokens;
        self
    }
}
