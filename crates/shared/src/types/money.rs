//! Money rounding and BRL formatting helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All helpers operate on `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// One cent, the settlement and remainder tolerance.
///
/// A sale is considered settled when the unallocated balance is within one
/// cent, and a remainder sale is only generated when the leftover debt
/// exceeds one cent.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a currency amount to 2 decimal places, half-up.
///
/// Applied at every persistence point: subtotals, totals, allocations.
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a quantity to 3 decimal places, half-up.
///
/// Quantities support fractional goods (e.g. 1.5 kg).
#[must_use]
pub fn round_quantity(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Error parsing a Brazilian-formatted currency string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    /// Input was empty after stripping the currency symbol.
    #[error("empty currency value")]
    Empty,
    /// Input was not a valid decimal number.
    #[error("invalid currency value: {0}")]
    Invalid(String),
}

/// Parses a Brazilian-formatted currency string (`"R$ 1.234,56"` → `1234.56`).
///
/// Accepts an optional `R$` prefix. When a comma is present it is taken as
/// the decimal separator and dots as thousands separators; otherwise the
/// input is parsed as a plain decimal.
pub fn parse_brl(input: &str) -> Result<Decimal, ParseMoneyError> {
    let stripped = input.trim().trim_start_matches("R$").trim();
    if stripped.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let normalized = if stripped.contains(',') {
        stripped.replace('.', "").replace(',', ".")
    } else {
        stripped.to_string()
    };

    normalized
        .parse::<Decimal>()
        .map_err(|_| ParseMoneyError::Invalid(input.trim().to_string()))
}

/// Formats a `Decimal` as Brazilian currency (`1234.56` → `"R$ 1.234,56"`).
#[must_use]
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_amount(value);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    // "1234.56" with exactly two fraction digits.
    let plain = format!("{abs:.2}");
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cent_is_one_hundredth() {
        assert_eq!(CENT, dec!(0.01));
    }

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(2.675), dec!(2.68))]
    #[case(dec!(-10.005), dec!(-10.01))]
    fn test_round_amount_half_up(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_amount(input), expected);
    }

    #[rstest]
    #[case(dec!(1.0005), dec!(1.001))]
    #[case(dec!(1.0004), dec!(1.000))]
    fn test_round_quantity_half_up(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_quantity(input), expected);
    }

    #[rstest]
    #[case("R$ 1.234,56", dec!(1234.56))]
    #[case("1.234,56", dec!(1234.56))]
    #[case("0,50", dec!(0.50))]
    #[case("1234.56", dec!(1234.56))]
    #[case("15", dec!(15))]
    #[case("R$15,00", dec!(15.00))]
    fn test_parse_brl(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_brl(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_brl_rejects_garbage() {
        assert_eq!(parse_brl("R$ "), Err(ParseMoneyError::Empty));
        assert!(matches!(parse_brl("abc"), Err(ParseMoneyError::Invalid(_))));
    }

    #[rstest]
    #[case(dec!(1234.56), "R$ 1.234,56")]
    #[case(dec!(0.5), "R$ 0,50")]
    #[case(dec!(1000000), "R$ 1.000.000,00")]
    #[case(dec!(-42.1), "R$ -42,10")]
    fn test_format_brl(#[case] input: Decimal, #[case] expected: &str) {
        assert_eq!(format_brl(input), expected);
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for raw in ["R$ 1.234,56", "R$ 0,01", "R$ 99.999,99"] {
            let value = parse_brl(raw).unwrap();
            assert_eq!(format_brl(value), raw);
        }
    }
}
