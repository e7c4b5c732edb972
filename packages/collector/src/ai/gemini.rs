//! Gemini implementation of the AI trait.
//!
//! The API key is read from a [`CredentialStore`] on every call, so a key
//! saved mid-session is picked up without rebuilding the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use collector::ai::GeminiAI;
//! use collector::stores::FileCredentialStore;
//!
//! let ai = GeminiAI::new(FileCredentialStore::new(".collector/credentials.json"));
//! let text = ai.generate("Say hi", GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError, GenerateContentRequest};
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::traits::ai::AI;
use crate::traits::store::CredentialStore;
use crate::types::config::GenerationOptions;

/// Gemini-backed AI.
///
/// Makes exactly one `generateContent` request per [`AI::generate`] call.
pub struct GeminiAI<C: CredentialStore> {
    client: GeminiClient,
    credentials: C,
}

impl<C: CredentialStore> GeminiAI<C> {
    /// Create with the default Gemini endpoint and model.
    pub fn new(credentials: C) -> Self {
        Self {
            client: GeminiClient::new(),
            credentials,
        }
    }

    /// Use a preconfigured client (custom base URL, model, or timeout).
    pub fn with_client(mut self, client: GeminiClient) -> Self {
        self.client = client;
        self
    }

    /// Get the underlying client.
    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Get the credential store.
    pub fn credentials(&self) -> &C {
        &self.credentials
    }
}

#[async_trait]
impl<C: CredentialStore> AI for GeminiAI<C> {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(ExtractionError::invalid_request("prompt must not be empty"));
        }
        options.validate()?;

        let api_key = self
            .credentials
            .get_credential()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to read stored API key");
                ExtractionError::CredentialMissing
            })?
            .filter(|key| !key.is_blank())
            .ok_or(ExtractionError::CredentialMissing)?;

        let request = GenerateContentRequest::from_prompt(prompt)
            .temperature(options.temperature)
            .max_output_tokens(options.max_tokens);

        debug!(
            model = %self.client.model(),
            prompt_len = prompt.len(),
            temperature = options.temperature,
            max_tokens = options.max_tokens,
            "Calling Gemini"
        );

        let response = self
            .client
            .generate_content(api_key.expose(), &request)
            .await
            .map_err(map_gemini_error)?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        response
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::MalformedResponse {
                reason: "response contained no candidate text".to_string(),
            })
    }
}

/// Map a client error onto the extraction error taxonomy.
///
/// 429 is rate limiting, 401 and 403 are credential problems, 400 is a bad
/// request, and every other status is an upstream error. The server's
/// message is carried through unchanged.
pub fn map_gemini_error(error: GeminiError) -> ExtractionError {
    match error {
        GeminiError::Status { status, message } => match status {
            429 => ExtractionError::RateLimited { message },
            401 | 403 => ExtractionError::InvalidCredential { message },
            400 => ExtractionError::InvalidRequest { message },
            _ => ExtractionError::UpstreamError { status, message },
        },
        GeminiError::Network(message) => ExtractionError::TransportError { message },
        GeminiError::Parse(reason) => ExtractionError::MalformedResponse { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::stores::MemoryCredentialStore;

    fn status(status: u16, message: &str) -> GeminiError {
        GeminiError::Status {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_gemini_error(status(429, "quota")).kind(), ErrorKind::RateLimited);
        assert_eq!(
            map_gemini_error(status(401, "bad key")).kind(),
            ErrorKind::InvalidCredential
        );
        assert_eq!(
            map_gemini_error(status(403, "denied")).kind(),
            ErrorKind::InvalidCredential
        );
        assert_eq!(map_gemini_error(status(400, "bad")).kind(), ErrorKind::InvalidRequest);
        assert_eq!(map_gemini_error(status(503, "down")).kind(), ErrorKind::UpstreamError);
    }

    #[test]
    fn test_message_is_preserved() {
        match map_gemini_error(status(429, "Resource has been exhausted")) {
            ExtractionError::RateLimited { message } => {
                assert_eq!(message, "Resource has been exhausted")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match map_gemini_error(status(500, "internal")) {
            ExtractionError::UpstreamError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transport_and_parse_mapping() {
        assert_eq!(
            map_gemini_error(GeminiError::Network("reset".into())).kind(),
            ErrorKind::TransportError
        );
        assert_eq!(
            map_gemini_error(GeminiError::Parse("eof".into())).kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        // Unroutable base URL: reaching the network would yield TransportError
        let ai = GeminiAI::new(MemoryCredentialStore::new())
            .with_client(GeminiClient::new().with_base_url("http://127.0.0.1:9"));

        let err = ai
            .generate("hello", GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_missing() {
        let ai = GeminiAI::new(MemoryCredentialStore::with_credential("   "));

        let err = ai
            .generate("hello", GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_locally() {
        let ai = GeminiAI::new(MemoryCredentialStore::with_credential("AIza-test"));

        let err = ai
            .generate("hello", GenerationOptions::default().with_temperature(1.5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = ai
            .generate("   ", GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
