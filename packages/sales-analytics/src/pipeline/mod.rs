//! Question answering and metrics pipeline.
//!
//! ```text
//! RowSource ──fetch──► rows ──aggregate──► SalesSummary
//!                                              │
//!                           ┌──────────────────┴─────────────┐
//!                           ▼                                ▼
//!                 delegate (TextGenerator)        classify + render
//!                           │  rejected ─────────────────────▲
//!                           ▼
//!                        answer
//! ```

pub mod aggregate;
pub mod answer;
pub mod classify;
pub mod delegate;
pub mod fetch;
pub mod metrics;
pub mod prompt;
pub mod render;

pub use aggregate::aggregate;
pub use answer::{Answer, AnswerSource, DatabaseStats, SalesAnalyst, SyncReport};
pub use classify::{classify, Intent, Question};
pub use delegate::{generate, DelegatedAnswer, DelegationOutcome};
pub use fetch::{fetch_all, PAGE_SIZE};
pub use metrics::{MonthlyMetrics, SummaryMetrics};
pub use render::render;
