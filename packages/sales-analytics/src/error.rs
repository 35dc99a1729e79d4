//! Typed errors for the analytics pipeline.
//!
//! Only [`FetchError`] ever reaches a caller as a failure. Row parse errors are
//! counted and dropped, generation errors route to the keyword fallback.

use thiserror::Error;

/// Boxed error from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The row-store could not be read.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure
    #[error("row-store unreachable: {0}")]
    Transport(#[source] BoxError),

    /// Non-2xx answer (bad credentials, unknown table)
    #[error("row-store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body was not a list of rows
    #[error("row-store returned malformed rows: {0}")]
    Decode(String),

    /// Missing URL or key
    #[error("row-store not configured: {0}")]
    NotConfigured(String),
}

/// A single row could not be turned into a [`crate::SalesRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Adding the row would push a running total past the decimal range
    #[error("{field} overflows the running totals")]
    Overflow { field: &'static str },
}

/// The text-generation capability did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No candidate or blank text
    #[error("generation returned no text")]
    Empty,

    /// Prompt or answer stopped by the content filter
    #[error("generation blocked by content filter: {0}")]
    ContentFiltered(String),

    /// Anything else: network, quota, missing key, malformed body
    #[error("generation failed: {0}")]
    Transport(String),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
