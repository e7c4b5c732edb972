//! Extraction pipeline - extract, then conditionally verify.
//!
//! Two sequential stages per call:
//!
//! 1. **Extract**: prompt the model with the source text and query, then
//!    normalize the answer into records. Any failure here is returned.
//! 2. **Verify**: only for long sources (over the configured threshold) that
//!    produced at least one record. The model audits its own records
//!    against the source. Any failure here is logged and the extract-stage
//!    records are returned unchanged.
//!
//! Each stage is one awaited AI call; there are no retries and no parallel
//! calls within an invocation.
//!
//! [`Extractor::structure_text`] is a separate single-call path that turns
//! one captured text into one structured object.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, ExtractionError, Result};
use crate::pipeline::normalize::{normalize_response, strip_code_fences};
use crate::pipeline::prompts::{
    format_extract_prompt, format_structure_prompt, format_verify_prompt,
};
use crate::traits::ai::AI;
use crate::types::{
    config::ExtractionConfig,
    record::{truncate_chars, ExtractionRequest, Record, VerificationRequest},
};

/// What happened in the verification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Source at or under the threshold, or nothing was extracted
    Skipped,
    /// Verified records replaced the extracted ones
    Verified,
    /// Verification failed; the extracted records were kept
    FellBack(ErrorKind),
}

/// Final records plus how they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub records: Vec<Record>,
    pub verification: Verification,
}

/// Runs the extract/verify pipeline against an [`AI`] implementation.
///
/// # Example
///
/// ```rust,ignore
/// let extractor = Extractor::new(GeminiAI::new(credentials));
/// let records = extractor.extract_and_verify(&page_text, "all speaker names").await?;
/// ```
pub struct Extractor<A: AI> {
    ai: A,
    config: ExtractionConfig,
}

impl<A: AI> Extractor<A> {
    /// Create an extractor with default configuration.
    pub fn new(ai: A) -> Self {
        Self {
            ai,
            config: ExtractionConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(ai: A, config: ExtractionConfig) -> Self {
        Self { ai, config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Get a reference to the AI.
    pub fn ai(&self) -> &A {
        &self.ai
    }

    /// Extract records for `query` from `source_text`, verifying when the
    /// source is long enough.
    ///
    /// Only extract-stage failures are returned.
    pub async fn extract_and_verify(&self, source_text: &str, query: &str) -> Result<Vec<Record>> {
        let request = ExtractionRequest::new(source_text, query, &self.config)?;
        Ok(self.run(&request).await?.records)
    }

    /// Run both stages for a prepared request and report what happened.
    pub async fn run(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome> {
        let text_len = request.source_len();
        info!(
            text_len,
            query = %request.query,
            verify = request.verify,
            "Starting extraction"
        );

        let extracted = self.extract(request).await?;

        if !request.verify {
            debug!(
                text_len,
                threshold = self.config.verify_threshold,
                "Text below verification threshold, skipping verification"
            );
            return Ok(ExtractionOutcome {
                records: extracted,
                verification: Verification::Skipped,
            });
        }

        if extracted.is_empty() {
            debug!("Nothing extracted, skipping verification");
            return Ok(ExtractionOutcome {
                records: extracted,
                verification: Verification::Skipped,
            });
        }

        let verification = VerificationRequest {
            source_text: &request.source_text,
            original_records: &extracted,
            query: &request.query,
        };

        match self.verify(verification).await {
            Ok(verified) => {
                info!(
                    extracted = extracted.len(),
                    verified = verified.len(),
                    "Verification complete"
                );
                Ok(ExtractionOutcome {
                    records: verified,
                    verification: Verification::Verified,
                })
            }
            Err(e) => {
                warn!(
                    error = %e,
                    kept = extracted.len(),
                    "Verification failed, returning extracted records"
                );
                Ok(ExtractionOutcome {
                    records: extracted,
                    verification: Verification::FellBack(e.kind()),
                })
            }
        }
    }

    /// Extract stage: one AI call, normalized and capped.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<Vec<Record>> {
        let prompt = format_extract_prompt(
            &request.source_text,
            &request.query,
            self.config.max_records,
        );
        let response = self
            .ai
            .generate(&prompt, self.config.extract_options)
            .await?;
        debug!(response_len = response.len(), raw = %response, "Raw extraction response");

        let records = normalize_response(&response)?;
        Ok(self.cap(records, "extract"))
    }

    /// Verify stage: one AI call auditing `request.original_records`.
    ///
    /// Errors are returned; [`run`](Self::run) turns them into a fallback.
    pub async fn verify(&self, request: VerificationRequest<'_>) -> Result<Vec<Record>> {
        let prompt = format_verify_prompt(
            request.source_text,
            request.original_records,
            request.query,
            self.config.max_records,
        );
        let response = self.ai.generate(&prompt, self.config.verify_options).await?;
        debug!(response_len = response.len(), raw = %response, "Raw verification response");

        let records = normalize_response(&response)?;
        Ok(self.cap(records, "verify"))
    }

    /// Turn one captured text into a single structured object.
    ///
    /// The model picks a `content_type` and the fields that fit it. A lone
    /// object wrapped in a one-element array is accepted; any other
    /// non-object answer is a malformed response.
    pub async fn structure_text(&self, text: &str) -> Result<Record> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::invalid_request("text must not be empty"));
        }

        let prompt = format_structure_prompt(truncate_chars(text, self.config.max_source_chars));
        let response = self
            .ai
            .generate(&prompt, self.config.extract_options)
            .await?;
        debug!(response_len = response.len(), raw = %response, "Raw structuring response");

        let value: Value = serde_json::from_str(strip_code_fences(&response)).map_err(
            |source| ExtractionError::MalformedJson {
                raw: response.clone(),
                source,
            },
        )?;

        let value = match value {
            Value::Array(mut items) if items.len() == 1 => items.remove(0),
            other => other,
        };
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ExtractionError::MalformedResponse {
                    reason: format!("expected a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        info!(field_count = map.len(), "Structured text");
        Ok(Record::from(map))
    }

    fn cap(&self, mut records: Vec<Record>, stage: &'static str) -> Vec<Record> {
        if records.len() > self.config.max_records {
            warn!(
                stage,
                returned = records.len(),
                max = self.config.max_records,
                "AI returned more records than allowed, truncating"
            );
            records.truncate(self.config.max_records);
        }
        records
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
