//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
///
/// The client does not interpret status codes; callers decide what a
/// 429 or a 403 means for them.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network error (DNS, connection refused/reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the API
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Parse error (response body is not the expected JSON)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
