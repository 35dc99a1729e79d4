//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
///
/// `Empty` and `Blocked` are not transport failures: the request succeeded but
/// produced nothing usable. Callers that fall back on rejection match on them.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, quota, invalid request)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// No candidate, or a candidate without text
    #[error("empty response (finish reason: {finish_reason:?})")]
    Empty { finish_reason: Option<String> },

    /// Prompt or candidate stopped by the safety filter
    #[error("response blocked: {reason}")]
    Blocked { reason: String },
}

impl GeminiError {
    /// Whether the service answered but refused on safety grounds.
    pub fn is_blocked(&self) -> bool {
        matches!(self, GeminiError::Blocked { .. })
    }

    /// Whether the service answered with nothing usable.
    pub fn is_empty(&self) -> bool {
        matches!(self, GeminiError::Empty { .. })
    }
}
