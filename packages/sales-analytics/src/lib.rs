//! Sales question answering over a paginated row-store.
//!
//! Rows are fetched in pages, reduced into a [`SalesSummary`], and a question
//! is answered either by a delegated text generator fed with that summary or,
//! when generation fails or is refused, by a keyword classifier that renders a
//! template from the same summary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sales_analytics::SalesAnalyst;
//! use sales_analytics::testing::{sale, MockGenerator, MockRowSource};
//!
//! let source = MockRowSource::new(vec![
//!     sale("2024-01-10", "Notebook", "Eletrônicos", "Sul", "2", "7000"),
//! ]);
//! let analyst = SalesAnalyst::new(Arc::new(source), Arc::new(MockGenerator::unavailable()));
//!
//! let answer = analyst.ask("qual região vendeu mais?").await;
//! println!("{}", answer.text);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Row-store and text-generation capabilities
//! - [`types`] - Raw rows, parsed records, month keys and the summary
//! - [`pipeline`] - Fetch, aggregate, delegate, classify, render, metrics
//! - [`cache`] - Time-bounded row cache
//! - [`format`] - pt-BR currency, unit and percentage rendering
//! - [`testing`] - Mock implementations for testing

pub mod cache;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

pub use cache::RowCache;
pub use error::{BoxError, FetchError, FetchResult, GenerationError, ParseError};
pub use format::{format_currency, format_percent};
pub use pipeline::{
    aggregate, classify, fetch_all, generate, render, Answer, AnswerSource, DatabaseStats,
    DelegatedAnswer, DelegationOutcome, Intent, MonthlyMetrics, Question, SalesAnalyst,
    SummaryMetrics, SyncReport,
};
pub use traits::{
    generator::{GenerationRequest, GeneratorFactory, LazyGenerator, TextGenerator},
    row_source::RowSource,
};
pub use types::{
    month::MonthKey,
    record::{parse_row, RawSalesRow, SalesRecord, SALES_FIELDS},
    summary::SalesSummary,
};
