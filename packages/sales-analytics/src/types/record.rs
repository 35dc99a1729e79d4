//! Sales rows as delivered by the row-store, and their parsed form.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ParseError;

/// Columns requested from the row-store. Every endpoint asks for the same set
/// so a cached row set serves all of them.
pub const SALES_FIELDS: &str =
    "id_transacao,data,produto,categoria,regiao,quantidade,preco_unitario,receita_total";

pub const UNKNOWN_PRODUCT: &str = "Desconhecido";
pub const UNKNOWN_CATEGORY: &str = "Sem categoria";
pub const UNKNOWN_REGION: &str = "Sem região";

/// One row exactly as the row-store returned it.
///
/// Every column is optional and loosely typed: numbers arrive as JSON numbers
/// or as strings with a decimal comma depending on how the data was uploaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSalesRow {
    pub id_transacao: Option<Value>,
    pub data: Option<Value>,
    pub produto: Option<Value>,
    pub categoria: Option<Value>,
    pub regiao: Option<Value>,
    /// `Some(Value::Null)` when the column came back empty
    #[serde(deserialize_with = "keep_null")]
    pub quantidade: Option<Value>,
    pub preco_unitario: Option<Value>,
    #[serde(deserialize_with = "keep_null")]
    pub receita_total: Option<Value>,
}

/// A present `null` stays `Some(Value::Null)`; only a missing key is `None`.
fn keep_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A validated transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub transaction_id: Option<String>,
    /// `None` when the date was absent or not ISO formatted.
    pub date: Option<NaiveDate>,
    pub product: String,
    pub category: String,
    pub region: String,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub revenue: Decimal,
}

/// Parse one raw row.
///
/// Quantity and revenue are mandatory in the sense that a present but
/// unparseable or `null` value rejects the row; a missing key counts as zero.
/// The date never rejects a row.
pub fn parse_row(raw: &RawSalesRow) -> Result<SalesRecord, ParseError> {
    let quantity = parse_amount("quantidade", raw.quantidade.as_ref())?;
    let revenue = parse_amount("receita_total", raw.receita_total.as_ref())?;
    let unit_price = match raw.preco_unitario.as_ref() {
        None | Some(Value::Null) => None,
        Some(v) => parse_amount("preco_unitario", Some(v)).ok(),
    };

    Ok(SalesRecord {
        transaction_id: raw.id_transacao.as_ref().and_then(value_text),
        date: raw.data.as_ref().and_then(parse_date),
        product: text_or(raw.produto.as_ref(), UNKNOWN_PRODUCT),
        category: text_or(raw.categoria.as_ref(), UNKNOWN_CATEGORY),
        region: text_or(raw.regiao.as_ref(), UNKNOWN_REGION),
        quantity,
        unit_price,
        revenue,
    })
}

/// Parse a decimal that may use a comma as decimal separator.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

fn parse_amount(field: &'static str, value: Option<&Value>) -> Result<Decimal, ParseError> {
    let Some(value) = value else {
        return Ok(Decimal::ZERO);
    };

    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };

    parsed.ok_or_else(|| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// First ten characters as `YYYY-MM-DD`; time and zone suffixes are ignored.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    let prefix: String = text.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(value_text)
        .unwrap_or_else(|| default.to_string())
}
