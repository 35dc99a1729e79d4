//! The answer pipeline: fetch → aggregate → delegate → fallback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::RowCache;
use crate::error::FetchResult;
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::classify::{classify_with_rule, Question};
use crate::pipeline::delegate::{generate, DelegationOutcome};
use crate::pipeline::fetch::{fetch_all, DEFAULT_MAX_RECORDS};
use crate::pipeline::metrics::{format_timestamp, MonthlyMetrics, SummaryMetrics};
use crate::pipeline::render::{render, NO_DATA_ANSWER};
use crate::traits::generator::TextGenerator;
use crate::traits::row_source::RowSource;
use crate::types::record::{RawSalesRow, SALES_FIELDS};

pub const EMPTY_QUESTION_ANSWER: &str = "❌ Por favor, faça uma pergunta.";
pub const UNREACHABLE_ANSWER: &str =
    "❌ Não foi possível acessar os dados. Verifique a conexão com o banco de dados.";

/// Which path produced an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSource {
    EmptyQuestion,
    Unreachable,
    NoData,
    Delegated,
    /// Keyword fallback, with the name of the rule that matched.
    Fallback {
        rule: &'static str,
        outcome: DelegationOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

impl Answer {
    fn new(text: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Outcome of a forced refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub message: String,
    pub records_analyzed: usize,
    pub timestamp: String,
}

/// Row-store bookkeeping for the admin view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub success: bool,
    pub total_records: usize,
    pub oldest_date: Option<String>,
    pub newest_date: Option<String>,
    pub last_updated: String,
}

/// Answers questions and serves metrics over one row-store table.
pub struct SalesAnalyst {
    source: Arc<dyn RowSource>,
    generator: Arc<dyn TextGenerator>,
    cache: Arc<RowCache>,
    max_records: usize,
}

impl SalesAnalyst {
    pub fn new(source: Arc<dyn RowSource>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            source,
            generator,
            cache: Arc::new(RowCache::default()),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }

    pub fn with_cache(mut self, cache: Arc<RowCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn cache(&self) -> &RowCache {
        &self.cache
    }

    /// Cached rows when fresh, otherwise a full paginated fetch.
    pub async fn load_rows(&self) -> FetchResult<Arc<Vec<RawSalesRow>>> {
        let now = Utc::now();
        if let Some(rows) = self.cache.get(now) {
            return Ok(rows);
        }

        let rows = fetch_all(self.source.as_ref(), SALES_FIELDS, self.max_records).await?;
        let rows = Arc::new(rows);
        self.cache.put(rows.clone(), now);
        Ok(rows)
    }

    /// Answer a question. Never fails: every error becomes answer text.
    pub async fn ask(&self, question: &str) -> Answer {
        if question.trim().is_empty() {
            return Answer::new(EMPTY_QUESTION_ANSWER, AnswerSource::EmptyQuestion);
        }

        let rows = match self.load_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Could not load rows for question");
                return Answer::new(UNREACHABLE_ANSWER, AnswerSource::Unreachable);
            }
        };

        let summary = aggregate(&rows);
        if summary.is_empty() {
            return Answer::new(NO_DATA_ANSWER, AnswerSource::NoData);
        }

        let delegated = generate(self.generator.as_ref(), &summary, question).await;
        if let Some(text) = delegated.text {
            info!(attempts = delegated.attempts, "Answered by delegated generation");
            return Answer::new(text, AnswerSource::Delegated);
        }

        let parsed = Question::parse(question);
        let (rule, intent) = classify_with_rule(&parsed);
        info!(rule, outcome = ?delegated.outcome, "Answering with keyword fallback");
        Answer::new(
            render(&intent, &parsed, &summary),
            AnswerSource::Fallback {
                rule,
                outcome: delegated.outcome,
            },
        )
    }

    pub async fn summary_metrics(&self) -> SummaryMetrics {
        let now = Utc::now();
        match self.load_rows().await {
            Ok(rows) => SummaryMetrics::from_summary(&aggregate(&rows), now),
            Err(e) => {
                warn!(error = %e, "Could not load rows for metrics");
                SummaryMetrics::unavailable(e.to_string(), now)
            }
        }
    }

    pub async fn monthly_metrics(&self) -> MonthlyMetrics {
        match self.load_rows().await {
            Ok(rows) => MonthlyMetrics::from_summary(&aggregate(&rows)),
            Err(e) => {
                warn!(error = %e, "Could not load rows for monthly metrics");
                MonthlyMetrics::unavailable(e.to_string())
            }
        }
    }

    /// Drop the cached rows and fetch again.
    pub async fn sync(&self) -> FetchResult<SyncReport> {
        self.cache.clear();
        let rows = self.load_rows().await?;
        info!(rows = rows.len(), "Row cache refreshed");

        Ok(SyncReport {
            success: true,
            message: "✅ Dados sincronizados com sucesso! Todas as métricas foram atualizadas."
                .to_string(),
            records_analyzed: rows.len(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    pub async fn database_stats(&self) -> FetchResult<DatabaseStats> {
        let rows = self.load_rows().await?;
        let summary = aggregate(&rows);
        let last_updated: DateTime<Utc> = self.cache.fetched_at().unwrap_or_else(Utc::now);

        Ok(DatabaseStats {
            success: true,
            total_records: rows.len(),
            oldest_date: summary.first_date.map(|d| d.format("%Y-%m-%d").to_string()),
            newest_date: summary.last_date.map(|d| d.format("%Y-%m-%d").to_string()),
            last_updated: format_timestamp(last_updated),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::testing::{sale, MockGenerator, MockRowSource};

    fn analyst(source: MockRowSource, generator: MockGenerator) -> SalesAnalyst {
        SalesAnalyst::new(Arc::new(source), Arc::new(generator))
    }

    #[tokio::test]
    async fn blank_question_skips_everything() {
        let source = Arc::new(MockRowSource::new(vec![]));
        let analyst = SalesAnalyst::new(source.clone(), Arc::new(MockGenerator::unavailable()));

        let answer = analyst.ask("   ").await;
        assert_eq!(answer.source, AnswerSource::EmptyQuestion);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_polite_answer() {
        let analyst = analyst(
            MockRowSource::with_len(10).failing(),
            MockGenerator::new().then_text("nunca"),
        );
        let answer = analyst.ask("qual o total?").await;
        assert_eq!(answer.text, UNREACHABLE_ANSWER);
    }

    #[tokio::test]
    async fn delegated_text_wins() {
        let analyst = analyst(
            MockRowSource::new(vec![sale("2024-01-01", "A", "X", "Sul", "1", "10")]),
            MockGenerator::new().then_text("## Resposta"),
        );
        let answer = analyst.ask("qual o total?").await;
        assert_eq!(answer.source, AnswerSource::Delegated);
        assert_eq!(answer.text, "## Resposta");
    }

    #[tokio::test]
    async fn rejection_falls_back_with_rule_name() {
        let analyst = analyst(
            MockRowSource::new(vec![sale("2024-01-01", "A", "X", "Sul", "1", "10")]),
            MockGenerator::new().then_error(GenerationError::Empty),
        );
        let answer = analyst.ask("qual região vendeu mais?").await;
        assert_eq!(
            answer.source,
            AnswerSource::Fallback {
                rule: "region",
                outcome: DelegationOutcome::EmptyResponse
            }
        );
        assert!(answer.text.contains("**Sul**"));
    }

    #[tokio::test]
    async fn rows_are_cached_between_calls() {
        let source = Arc::new(MockRowSource::new(vec![sale(
            "2024-01-01",
            "A",
            "X",
            "Sul",
            "1",
            "10",
        )]));
        let analyst = SalesAnalyst::new(source.clone(), Arc::new(MockGenerator::unavailable()));

        analyst.summary_metrics().await;
        analyst.monthly_metrics().await;
        assert_eq!(source.calls().len(), 1);

        let report = analyst.sync().await.unwrap();
        assert_eq!(report.records_analyzed, 1);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn database_stats_reports_date_range() {
        let analyst = analyst(
            MockRowSource::new(vec![
                sale("2024-05-01", "A", "X", "Sul", "1", "10"),
                sale("2024-01-09", "B", "X", "Sul", "1", "10"),
            ]),
            MockGenerator::unavailable(),
        );
        let stats = analyst.database_stats().await.unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.oldest_date.as_deref(), Some("2024-01-09"));
        assert_eq!(stats.newest_date.as_deref(), Some("2024-05-01"));
    }
}
