//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without a row-store or a generation
//! service.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, GenerationError};
use crate::traits::{
    generator::{GenerationRequest, TextGenerator},
    row_source::RowSource,
};
use crate::types::record::RawSalesRow;

/// Build a raw row the way the row-store returns uploaded spreadsheets: every
/// value as a string.
pub fn sale(
    date: &str,
    product: &str,
    category: &str,
    region: &str,
    quantity: &str,
    revenue: &str,
) -> RawSalesRow {
    let text = |s: &str| Some(Value::String(s.to_string()));
    RawSalesRow {
        id_transacao: None,
        data: text(date),
        produto: text(product),
        categoria: text(category),
        regiao: text(region),
        quantidade: text(quantity),
        preco_unitario: None,
        receita_total: text(revenue),
    }
}

/// Record of a `select` made against [`MockRowSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCall {
    pub fields: String,
    pub offset: usize,
    pub limit: usize,
}

/// An in-memory table served in windows.
#[derive(Default)]
pub struct MockRowSource {
    rows: Vec<RawSalesRow>,

    /// Calls from this zero-based index on fail with a transport error
    fail_from: Option<usize>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<SelectCall>>>,
}

impl MockRowSource {
    pub fn new(rows: Vec<RawSalesRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// A table of `len` identical valid rows.
    pub fn with_len(len: usize) -> Self {
        Self::new(vec![sale("2024-01-15", "Produto", "Categoria", "Sul", "1", "10"); len])
    }

    /// Fail every select from the `call`-th on (zero-based).
    pub fn failing_from(mut self, call: usize) -> Self {
        self.fail_from = Some(call);
        self
    }

    /// Fail every select.
    pub fn failing(self) -> Self {
        self.failing_from(0)
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<SelectCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl RowSource for MockRowSource {
    async fn select(
        &self,
        fields: &str,
        offset: usize,
        limit: usize,
    ) -> FetchResult<Vec<RawSalesRow>> {
        let index = {
            let mut calls = self.calls.write().unwrap();
            calls.push(SelectCall {
                fields: fields.to_string(),
                offset,
                limit,
            });
            calls.len() - 1
        };

        if self.fail_from.is_some_and(|from| index >= from) {
            return Err(FetchError::Transport("mock connection refused".into()));
        }

        let start = offset.min(self.rows.len());
        let end = offset.saturating_add(limit).min(self.rows.len());
        Ok(self.rows[start..end].to_vec())
    }
}

/// A generator that replays scripted results in order.
///
/// Once the script runs out every call fails with a transport error.
#[derive(Default)]
pub struct MockGenerator {
    script: Arc<RwLock<VecDeque<Result<String, GenerationError>>>>,
    requests: Arc<RwLock<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator with nothing scripted: always a transport error.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.script.write().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn then_error(self, error: GenerationError) -> Self {
        self.script.write().unwrap().push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.write().unwrap().push(request.clone());
        self.script
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transport("mock generator unavailable".into())))
    }
}
