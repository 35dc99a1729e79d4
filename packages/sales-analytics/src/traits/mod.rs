//! Capabilities the pipeline consumes.
//!
//! The server wires real REST clients behind these; tests use
//! [`crate::testing`] mocks.

pub mod generator;
pub mod row_source;
