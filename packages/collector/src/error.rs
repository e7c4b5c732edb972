//! Typed errors for the collector library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure kind instead of inspecting message text.

use thiserror::Error;

/// Errors from the AI client, the response normalizer, and the pipeline.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No API key has been stored
    #[error("no API key configured")]
    CredentialMissing,

    /// Upstream returned HTTP 429
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Upstream returned HTTP 401 or 403
    #[error("invalid API key: {message}")]
    InvalidCredential { message: String },

    /// Upstream returned HTTP 400, or the request failed local validation
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Any other non-2xx response
    #[error("upstream error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    /// 2xx response without a usable text payload
    #[error("malformed AI response: {reason}")]
    MalformedResponse { reason: String },

    /// AI text could not be parsed as JSON; `raw` keeps the text for diagnostics
    #[error("AI returned invalid JSON: {source}")]
    MalformedJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Network-level failure (DNS, timeout, connection reset)
    #[error("network error: {message}")]
    TransportError { message: String },
}

/// Discriminant of [`ExtractionError`], for mapping to UI text or metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CredentialMissing,
    RateLimited,
    InvalidCredential,
    InvalidRequest,
    UpstreamError,
    MalformedResponse,
    MalformedJson,
    TransportError,
}

impl ExtractionError {
    /// The error kind, without payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::CredentialMissing => ErrorKind::CredentialMissing,
            ExtractionError::RateLimited { .. } => ErrorKind::RateLimited,
            ExtractionError::InvalidCredential { .. } => ErrorKind::InvalidCredential,
            ExtractionError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ExtractionError::UpstreamError { .. } => ErrorKind::UpstreamError,
            ExtractionError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            ExtractionError::MalformedJson { .. } => ErrorKind::MalformedJson,
            ExtractionError::TransportError { .. } => ErrorKind::TransportError,
        }
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::CredentialMissing => {
                "Please add Google AI API key in Settings".to_string()
            }
            ExtractionError::RateLimited { .. } => {
                "Rate limit reached. Try again in a moment.".to_string()
            }
            ExtractionError::InvalidCredential { .. } => {
                "Invalid API key. Please check your settings.".to_string()
            }
            ExtractionError::InvalidRequest { message } => {
                format!("Invalid request: {}", message)
            }
            ExtractionError::UpstreamError { message, .. } => format!("API Error: {}", message),
            ExtractionError::MalformedResponse { .. } => {
                "The AI service returned an empty response. Please try again.".to_string()
            }
            ExtractionError::MalformedJson { .. } => {
                "Could not extract structure. Try manual editing.".to_string()
            }
            ExtractionError::TransportError { message } => format!("Network Error: {}", message),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        ExtractionError::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Errors from collection and credential stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Collection does not exist
    #[error("collection not found: {id}")]
    CollectionNotFound { id: String },

    /// Item does not exist in the given collection
    #[error("item {item_id} not found in collection {collection_id}")]
    ItemNotFound {
        collection_id: String,
        item_id: String,
    },

    /// Nothing to save
    #[error("extraction produced no records to save")]
    EmptyExtraction,

    /// File I/O failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be (de)serialized
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
