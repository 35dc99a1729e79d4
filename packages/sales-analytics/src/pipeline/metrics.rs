//! Dashboard metrics derived from a summary.
//!
//! Field names are part of the dashboard contract. Absent data is reported
//! with sentinel values, never by omitting fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_currency, units};
use crate::types::summary::{leader, top_n, SalesSummary};

pub const NO_DATA_LABEL: &str = "Sem dados";
pub const LOAD_ERROR_LABEL: &str = "Erro ao carregar";
pub const ZERO_CURRENCY: &str = "R$ 0,00";

const MONTH_TOP_PRODUCTS: usize = 5;

/// `dd/mm/YYYY HH:MM` in UTC.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%d/%m/%Y %H:%M").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMonth {
    pub nome: String,
    pub valor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub nome: String,
    pub quantidade: i64,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub melhor_mes: BestMonth,
    pub produto_mais_vendido: TopProduct,
    pub quantidade_produtos: usize,
    pub vendas_totais_ano: String,
    pub files_processed: usize,
    pub records_analyzed: usize,
    pub last_updated: String,
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryMetrics {
    pub fn from_summary(summary: &SalesSummary, now: DateTime<Utc>) -> Self {
        if summary.is_empty() {
            return Self::placeholder(NO_DATA_LABEL, None, now);
        }

        let melhor_mes = match leader(&summary.revenue_by_month) {
            Some((month, revenue)) => BestMonth {
                nome: month.to_string(),
                valor: format_currency(revenue),
            },
            None => BestMonth {
                nome: NO_DATA_LABEL.to_string(),
                valor: ZERO_CURRENCY.to_string(),
            },
        };

        let produto_mais_vendido = match leader(&summary.quantity_by_product) {
            Some((product, quantity)) => TopProduct {
                nome: product,
                quantidade: units(quantity),
            },
            None => TopProduct {
                nome: NO_DATA_LABEL.to_string(),
                quantidade: 0,
            },
        };

        Self {
            melhor_mes,
            produto_mais_vendido,
            quantidade_produtos: summary.unique_product_count,
            vendas_totais_ano: format_currency(summary.total_revenue),
            files_processed: 1,
            records_analyzed: summary.row_count,
            last_updated: format_timestamp(now),
            no_data: false,
            error: None,
        }
    }

    /// Sentinels reported when the row-store could not be read.
    pub fn unavailable(error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::placeholder(LOAD_ERROR_LABEL, Some(error.into()), now)
    }

    fn placeholder(label: &str, error: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            melhor_mes: BestMonth {
                nome: label.to_string(),
                valor: ZERO_CURRENCY.to_string(),
            },
            produto_mais_vendido: TopProduct {
                nome: label.to_string(),
                quantidade: 0,
            },
            quantidade_produtos: 0,
            vendas_totais_ano: ZERO_CURRENCY.to_string(),
            files_processed: 0,
            records_analyzed: 0,
            last_updated: format_timestamp(now),
            no_data: true,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthMetrics {
    pub month: String,
    pub total_revenue: String,
    pub total_sales: usize,
    pub top_products: Vec<ProductQuantity>,
}

/// Per-month breakdown, oldest month first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetrics {
    pub no_data: bool,
    pub months: Vec<MonthMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MonthlyMetrics {
    pub fn from_summary(summary: &SalesSummary) -> Self {
        let months: Vec<MonthMetrics> = summary
            .months()
            .into_iter()
            .map(|key| MonthMetrics {
                month: key.to_string(),
                total_revenue: format_currency(summary.month_revenue(&key)),
                total_sales: summary.month_sales(&key),
                top_products: summary
                    .quantity_by_product_and_month
                    .get(&key)
                    .map(|products| top_n(products, MONTH_TOP_PRODUCTS))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(name, quantity)| ProductQuantity {
                        name,
                        quantity: units(quantity),
                    })
                    .collect(),
            })
            .collect();

        Self {
            no_data: months.is_empty(),
            months,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            no_data: true,
            months: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate::aggregate;
    use crate::testing::sale;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 5, 0).unwrap()
    }

    #[test]
    fn empty_summary_uses_sentinels() {
        let metrics = SummaryMetrics::from_summary(&SalesSummary::default(), now());

        assert_eq!(metrics.melhor_mes.nome, "Sem dados");
        assert_eq!(metrics.melhor_mes.valor, "R$ 0,00");
        assert_eq!(metrics.produto_mais_vendido.quantidade, 0);
        assert_eq!(metrics.vendas_totais_ano, "R$ 0,00");
        assert_eq!(metrics.files_processed, 0);
        assert!(metrics.no_data);
        assert_eq!(metrics.last_updated, "31/12/2024 23:05");

        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn headline_numbers() {
        let summary = aggregate(&[
            sale("2024-01-05", "Notebook", "Eletrônicos", "Sul", "2", "7000"),
            sale("2024-02-06", "Mouse", "Acessórios", "Norte", "10.7", "500"),
        ]);
        let metrics = SummaryMetrics::from_summary(&summary, now());

        assert_eq!(metrics.melhor_mes.nome, "Janeiro/2024");
        assert_eq!(metrics.melhor_mes.valor, "R$ 7.000,00");
        assert_eq!(metrics.produto_mais_vendido.nome, "Mouse");
        assert_eq!(metrics.produto_mais_vendido.quantidade, 10);
        assert_eq!(metrics.quantidade_produtos, 2);
        assert_eq!(metrics.vendas_totais_ano, "R$ 7.500,00");
        assert_eq!(metrics.records_analyzed, 2);
        assert!(!metrics.no_data);
    }

    #[test]
    fn unavailable_reports_error() {
        let metrics = SummaryMetrics::unavailable("timeout", now());
        assert_eq!(metrics.melhor_mes.nome, "Erro ao carregar");
        assert_eq!(metrics.error.as_deref(), Some("timeout"));
        assert!(metrics.no_data);
    }

    #[test]
    fn monthly_is_chronological_with_top_five() {
        let mut rows = vec![sale("2024-03-01", "Z", "X", "Sul", "1", "10")];
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            let qty = (i + 1).to_string();
            rows.push(sale("2024-01-15", name, "X", "Sul", &qty, "1"));
        }
        let monthly = MonthlyMetrics::from_summary(&aggregate(&rows));

        assert!(!monthly.no_data);
        let names: Vec<&str> = monthly.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(names, ["Janeiro/2024", "Março/2024"]);

        let january = &monthly.months[0];
        assert_eq!(january.total_sales, 6);
        assert_eq!(january.total_revenue, "R$ 6,00");
        let top: Vec<&str> = january.top_products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(top, ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn monthly_without_dates_is_no_data() {
        let monthly = MonthlyMetrics::from_summary(&SalesSummary::default());
        assert!(monthly.no_data);
        assert!(monthly.months.is_empty());
    }
}
