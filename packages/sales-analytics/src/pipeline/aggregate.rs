//! Row set → [`SalesSummary`] reduction.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::types::month::MonthKey;
use crate::types::record::{parse_row, RawSalesRow, SalesRecord};
use crate::types::summary::{MonthlyTotals, SalesSummary, Totals};

/// Fold every parseable row into grouped totals.
///
/// Pure: the same rows always produce an equal summary. Rows whose quantity or
/// revenue does not parse, or would overflow a total, are counted in
/// `skipped_rows` and otherwise ignored.
pub fn aggregate(rows: &[RawSalesRow]) -> SalesSummary {
    let mut summary = SalesSummary {
        row_count: rows.len(),
        ..Default::default()
    };

    for (index, raw) in rows.iter().enumerate() {
        match parse_row(raw).and_then(|record| fits(&summary, &record).map(|()| record)) {
            Ok(record) => add_record(&mut summary, &record),
            Err(e) => {
                trace!(index, error = %e, "Skipping sales row");
                summary.skipped_rows += 1;
            }
        }
    }

    summary.unique_product_count = summary
        .revenue_by_product
        .keys()
        .filter(|name| !name.trim().is_empty())
        .count();

    debug!(
        rows = summary.row_count,
        records = summary.record_count,
        skipped = summary.skipped_rows,
        months = summary.revenue_by_month.len(),
        products = summary.unique_product_count,
        "Aggregated sales rows"
    );

    summary
}

/// Whether every total the record feeds can absorb it.
fn fits(summary: &SalesSummary, record: &SalesRecord) -> Result<(), ParseError> {
    let revenue = |total: Option<Decimal>| check(total, record.revenue, "receita_total");
    let quantity = |total: Option<Decimal>| check(total, record.quantity, "quantidade");

    revenue(Some(summary.total_revenue))?;
    quantity(Some(summary.total_quantity))?;
    revenue(summary.revenue_by_product.get(&record.product).copied())?;
    quantity(summary.quantity_by_product.get(&record.product).copied())?;
    revenue(summary.revenue_by_category.get(&record.category).copied())?;
    quantity(summary.quantity_by_category.get(&record.category).copied())?;
    revenue(summary.revenue_by_region.get(&record.region).copied())?;
    quantity(summary.quantity_by_region.get(&record.region).copied())?;

    let Some(date) = record.date else {
        return Ok(());
    };
    let month = MonthKey::from_date(date);
    let cell = |map: &MonthlyTotals, key: &str| map.get(&month).and_then(|m| m.get(key)).copied();

    revenue(summary.revenue_by_month.get(&month).copied())?;
    revenue(cell(&summary.revenue_by_region_and_month, &record.region))?;
    quantity(cell(&summary.quantity_by_region_and_month, &record.region))?;
    quantity(cell(&summary.quantity_by_product_and_month, &record.product))?;
    Ok(())
}

fn check(total: Option<Decimal>, value: Decimal, field: &'static str) -> Result<(), ParseError> {
    total
        .unwrap_or_default()
        .checked_add(value)
        .map(|_| ())
        .ok_or(ParseError::Overflow { field })
}

fn add_record(summary: &mut SalesSummary, record: &SalesRecord) {
    summary.record_count += 1;
    summary.total_revenue = summary.total_revenue.saturating_add(record.revenue);
    summary.total_quantity = summary.total_quantity.saturating_add(record.quantity);

    bump(&mut summary.revenue_by_product, &record.product, record.revenue);
    bump(&mut summary.quantity_by_product, &record.product, record.quantity);
    bump(&mut summary.revenue_by_category, &record.category, record.revenue);
    bump(&mut summary.quantity_by_category, &record.category, record.quantity);
    bump(&mut summary.revenue_by_region, &record.region, record.revenue);
    bump(&mut summary.quantity_by_region, &record.region, record.quantity);

    let Some(date) = record.date else {
        return;
    };

    summary.first_date = Some(summary.first_date.map_or(date, |d| d.min(date)));
    summary.last_date = Some(summary.last_date.map_or(date, |d| d.max(date)));

    let month = MonthKey::from_date(date);
    let month_revenue = summary.revenue_by_month.entry(month).or_default();
    *month_revenue = month_revenue.saturating_add(record.revenue);
    *summary.sales_count_by_month.entry(month).or_default() += 1;

    bump_nested(
        &mut summary.revenue_by_region_and_month,
        month,
        &record.region,
        record.revenue,
    );
    bump_nested(
        &mut summary.quantity_by_region_and_month,
        month,
        &record.region,
        record.quantity,
    );
    bump_nested(
        &mut summary.quantity_by_product_and_month,
        month,
        &record.product,
        record.quantity,
    );
}

fn bump(map: &mut Totals, key: &str, value: Decimal) {
    match map.get_mut(key) {
        Some(total) => *total = total.saturating_add(value),
        None => {
            map.insert(key.to_string(), value);
        }
    }
}

fn bump_nested(map: &mut MonthlyTotals, month: MonthKey, key: &str, value: Decimal) {
    bump(map.entry(month).or_default(), key, value);
}
