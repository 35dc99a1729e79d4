//! The aggregated view of a row set.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use super::month::MonthKey;

/// Per-key totals in first-encountered key order.
pub type Totals<K = String> = IndexMap<K, Decimal>;

/// Month → (key → total).
pub type MonthlyTotals = IndexMap<MonthKey, Totals>;

/// Grouped numeric summary of one row set.
///
/// Built fresh for every request and discarded afterwards. Maps keep the order
/// in which keys were first seen; that order breaks ties in every ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    /// Rows received, valid or not.
    pub row_count: usize,
    /// Rows that parsed and were aggregated.
    pub record_count: usize,
    /// Rows dropped because quantity or revenue did not parse.
    pub skipped_rows: usize,

    /// Includes rows without a usable date.
    pub total_revenue: Decimal,
    pub total_quantity: Decimal,
    pub unique_product_count: usize,

    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,

    /// Only rows with a usable date contribute to month-keyed maps.
    pub revenue_by_month: Totals<MonthKey>,
    pub sales_count_by_month: IndexMap<MonthKey, usize>,

    pub revenue_by_product: Totals,
    pub quantity_by_product: Totals,
    pub revenue_by_category: Totals,
    pub quantity_by_category: Totals,
    pub revenue_by_region: Totals,
    pub quantity_by_region: Totals,

    pub revenue_by_region_and_month: MonthlyTotals,
    pub quantity_by_region_and_month: MonthlyTotals,
    pub quantity_by_product_and_month: MonthlyTotals,
}

impl SalesSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Months with data, oldest first.
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> = self.revenue_by_month.keys().copied().collect();
        months.sort();
        months
    }

    /// The most recent month in the data whose calendar month is `month`.
    ///
    /// Questions name months without a year; with multi-year data the latest
    /// occurrence is the one meant.
    pub fn latest_month(&self, month: u32) -> Option<MonthKey> {
        self.revenue_by_month
            .keys()
            .filter(|k| k.month == month)
            .max()
            .copied()
    }

    pub fn month_revenue(&self, key: &MonthKey) -> Decimal {
        self.revenue_by_month.get(key).copied().unwrap_or_default()
    }

    pub fn month_sales(&self, key: &MonthKey) -> usize {
        self.sales_count_by_month.get(key).copied().unwrap_or_default()
    }

    /// Sum of all month totals. Differs from `total_revenue` when some rows had
    /// no usable date.
    pub fn dated_revenue(&self) -> Decimal {
        saturating_sum(self.revenue_by_month.values().copied())
    }
}

/// Sum that clamps at the ends of the decimal range instead of panicking.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// Entries sorted by value, largest first. Ties keep map order.
pub fn ranked<K: Clone>(totals: &IndexMap<K, Decimal>) -> Vec<(K, Decimal)> {
    let mut entries: Vec<(K, Decimal)> = totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// First `n` entries of [`ranked`].
pub fn top_n<K: Clone>(totals: &IndexMap<K, Decimal>, n: usize) -> Vec<(K, Decimal)> {
    let mut entries = ranked(totals);
    entries.truncate(n);
    entries
}

/// Largest entry; the first-seen key wins a tie.
pub fn leader<K: Clone>(totals: &IndexMap<K, Decimal>) -> Option<(K, Decimal)> {
    ranked(totals).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, i64)]) -> Totals {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn ranking_is_descending_and_stable_on_ties() {
        let t = totals(&[("Sul", 10), ("Norte", 30), ("Leste", 10), ("Oeste", 30)]);
        let names: Vec<String> = ranked(&t).into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["Norte", "Oeste", "Sul", "Leste"]);
    }

    #[test]
    fn leader_prefers_first_seen_on_tie() {
        let t = totals(&[("B", 5), ("A", 5)]);
        assert_eq!(leader(&t).map(|(k, _)| k).as_deref(), Some("B"));
        assert_eq!(leader(&Totals::<String>::new()), None);
    }

    #[test]
    fn latest_month_picks_most_recent_year() {
        let mut summary = SalesSummary::default();
        summary
            .revenue_by_month
            .insert(MonthKey::new(2024, 3), Decimal::ONE);
        summary
            .revenue_by_month
            .insert(MonthKey::new(2023, 3), Decimal::ONE);
        summary
            .revenue_by_month
            .insert(MonthKey::new(2024, 1), Decimal::ONE);

        assert_eq!(summary.latest_month(3), Some(MonthKey::new(2024, 3)));
        assert_eq!(summary.latest_month(5), None);
    }

    #[test]
    fn saturating_sum_clamps() {
        assert_eq!(saturating_sum([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(saturating_sum([Decimal::MIN, Decimal::NEGATIVE_ONE]), Decimal::MIN);
        assert_eq!(saturating_sum([Decimal::ONE, Decimal::TWO]), Decimal::from(3));
    }
}
