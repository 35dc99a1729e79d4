// Sales Insights - API Core
//
// HTTP backend answering natural-language questions about a sales table.
// Rows come from Supabase, answers from Gemini with a keyword fallback.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
