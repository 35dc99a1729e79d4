//! pt-BR number rendering shared by prompts, templates and metrics.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// `R$ 1.234,56`. Two fractional digits, half away from zero, sign after the
/// symbol (`R$ -1.234,50`).
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_number(value, 2))
}

/// Group thousands with `.` and use `,` before the `dp` fractional digits.
pub fn format_number(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", dp as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Unit counts are truncated, never rounded.
pub fn units(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or_default()
}

/// One fractional digit with a `.` separator: `50.0%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

/// `part / whole × 100`, zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    scaled_ratio(part, whole)
}

/// `(current − previous) / previous × 100`, `None` without a base to compare to.
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(scaled_ratio(current.saturating_sub(previous), previous))
}

/// `numerator / denominator × 100`, saturating at the ends of the decimal range.
fn scaled_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn currency_uses_brazilian_separators() {
        assert_eq!(format_currency(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(format_currency(dec("50000")), "R$ 50.000,00");
        assert_eq!(format_currency(dec("1234567.8")), "R$ 1.234.567,80");
        assert_eq!(format_currency(dec("999")), "R$ 999,00");
        assert_eq!(format_currency(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec("0.005")), "R$ 0,01");
        assert_eq!(format_currency(dec("2.345")), "R$ 2,35");
        assert_eq!(format_currency(dec("-2.345")), "R$ -2,35");
    }

    #[test]
    fn negative_sign_follows_symbol() {
        assert_eq!(format_currency(dec("-1234.5")), "R$ -1.234,50");
        assert_eq!(format_currency(dec("-0.001")), "R$ 0,00");
    }

    #[test]
    fn units_truncate() {
        assert_eq!(units(dec("2.9")), 2);
        assert_eq!(units(dec("-2.9")), -2);
        assert_eq!(units(dec("1500")), 1500);
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percent(percent_of(dec("50"), dec("100"))), "50.0%");
        assert_eq!(format_percent(dec("33.333")), "33.3%");
        assert_eq!(format_percent(dec("-12.25")), "-12.3%");
        assert_eq!(percent_of(Decimal::ONE, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            percent_change(dec("100000"), dec("150000")),
            Some(dec("50"))
        );
        assert_eq!(percent_change(Decimal::ZERO, dec("10")), None);
    }

    #[test]
    fn percentages_saturate_instead_of_overflowing() {
        assert_eq!(percent_of(Decimal::MAX, dec("0.001")), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MIN, dec("0.001")), Decimal::MIN);
        assert_eq!(
            percent_change(dec("-0.0001"), Decimal::MAX),
            Some(Decimal::MIN)
        );
        assert_eq!(percent_change(dec("0.01"), Decimal::MAX), Some(Decimal::MAX));
    }
}
