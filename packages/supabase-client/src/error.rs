//! Error types for the Supabase client.

use thiserror::Error;

/// Result type for Supabase client operations.
pub type Result<T> = std::result::Result<T, SupabaseError>;

/// Supabase client errors.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Configuration error (missing URL or key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from PostgREST
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SupabaseError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SupabaseError::Parse(e.to_string())
        } else {
            SupabaseError::Network(e.to_string())
        }
    }
}
