//! Calendar month keys rendered with the fixed pt-BR month table.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Month names in the target locale, January first.
pub const PT_BR_MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// A (year, month) pair. Orders chronologically, displays as `"Março/2024"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Localized month name without the year.
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Localized name for a month number; out-of-range numbers clamp into the table.
pub fn month_name(month: u32) -> &'static str {
    let idx = month.clamp(1, 12) as usize - 1;
    PT_BR_MONTHS[idx]
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name(), self.year)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_localized_name_and_year() {
        let key = MonthKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(key.to_string(), "Março/2024");
        assert_eq!(key.name(), "Março");
    }

    #[test]
    fn orders_chronologically_not_alphabetically() {
        let mut keys = vec![
            MonthKey::new(2024, 8),
            MonthKey::new(2023, 12),
            MonthKey::new(2024, 4),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["Dezembro/2023", "Abril/2024", "Agosto/2024"]);
    }
}
