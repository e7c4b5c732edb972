//! AI trait for text generation.
//!
//! The pipeline needs exactly one capability from a model: turn a prompt
//! into text. Providers, credentials, and HTTP status mapping live behind
//! this seam so the pipeline can be driven by a mock in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::config::GenerationOptions;

/// AI trait for LLM text generation.
///
/// Implementations must make a single attempt per call and must not
/// retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait AI: Send + Sync {
    /// Generate text for a prompt.
    ///
    /// Errors use the [`ExtractionError`](crate::error::ExtractionError)
    /// taxonomy: `CredentialMissing` before any network activity,
    /// HTTP failures mapped by status class, `MalformedResponse` when a
    /// successful response carries no text, `TransportError` otherwise.
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String>;
}

#[async_trait]
impl<T: AI + ?Sized> AI for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        (**self).generate(prompt, options).await
    }
}
