//! Kernel module - adapters from the external clients to the pipeline traits.

pub mod deps;

pub use deps::{gemini_factory, GeminiGenerator, SupabaseRowSource};
