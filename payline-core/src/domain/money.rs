//! Money amounts and price formatting
//!
//! Amounts are displayed as `-GBP 1,234.56`: optional sign, currency code,
//! integer part grouped by thousands, and exactly two fraction digits.
//! Fraction digits are truncated, never rounded.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// An amount in a given currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub value: Decimal,
    /// Lowercase-normalized currency code
    pub currency_code: String,
}

impl Money {
    pub fn new(value: Decimal, currency_code: &str) -> Self {
        Self {
            value,
            currency_code: super::identifier::normalize_currency(currency_code),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Display form with the currency code in upper case, e.g. `GBP 10.40`
    pub fn display(&self) -> String {
        format_amount(self.value, &self.currency_code.to_uppercase())
    }
}

/// Parse a decimal string, accepting plain and scientific notation
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Pad a single digit with `0` and keep at most two characters
fn two_digit_fraction(fraction: &str) -> String {
    let mut digits: String = fraction.chars().take(2).collect();
    if digits.chars().count() == 1 {
        digits.push('0');
    }
    digits
}

/// Insert `,` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Sign and integer digits of a plain `-?digits(.digits)?` amount
///
/// Handles magnitudes beyond `Decimal`'s range. Leading zeros are dropped.
fn plain_amount(raw: &str) -> Option<(bool, String)> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction) {
        return None;
    }

    let nonzero = integer.chars().chain(fraction.chars()).any(|c| c != '0');
    let digits = integer.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    Some((negative && nonzero, digits.to_string()))
}

/// Format a raw amount string for display
///
/// Unparseable input is shown as zero rather than rejected; use
/// [`try_format_as_price`] where bad data must surface.
pub fn format_as_price(raw_value: &str, currency_code: &str) -> String {
    let trimmed = raw_value.trim();
    let mut parts = trimmed.split('.');
    let integer_part = parts.next().filter(|p| !p.is_empty()).unwrap_or("0");
    let fraction_part = parts.next().filter(|p| !p.is_empty()).unwrap_or("0");

    let (is_negative, integer_digits) = match plain_amount(trimmed) {
        Some(plain) => plain,
        None => {
            let is_negative = parse_decimal(trimmed).is_some_and(|v| v < Decimal::ZERO);
            let integer = parse_decimal(integer_part)
                .unwrap_or(Decimal::ZERO)
                .abs()
                .trunc();
            (is_negative, integer.to_string())
        }
    };

    format!(
        "{}{} {}.{}",
        if is_negative { "-" } else { "" },
        currency_code,
        group_thousands(&integer_digits),
        two_digit_fraction(fraction_part)
    )
}

/// Strict variant of [`format_as_price`] that rejects malformed amounts
pub fn try_format_as_price(raw_value: &str, currency_code: &str) -> Result<String> {
    let trimmed = raw_value.trim();
    let well_formed = plain_amount(trimmed).is_some()
        || (parse_decimal(trimmed).is_some()
            && trimmed
                .split('.')
                .nth(1)
                .map_or(true, |fraction| fraction.chars().all(|c| c.is_ascii_digit())));
    if !well_formed {
        return Err(Error::InvalidAmount(raw_value.to_string()));
    }
    Ok(format_as_price(trimmed, currency_code))
}

/// Format a decimal amount for display
pub fn format_amount(value: Decimal, currency_code: &str) -> String {
    format_as_price(&value.to_string(), currency_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_pads_fraction() {
        assert_eq!(format_as_price("-10.4", "GBP"), "-GBP 10.40");
    }

    #[test]
    fn test_large_amount_is_grouped_and_truncated() {
        assert_eq!(
            format_as_price("100896630.129", "GBP"),
            "GBP 100,896,630.12"
        );
    }

    #[test]
    fn test_fraction_is_truncated_not_rounded() {
        assert_eq!(format_as_price("0.999", "EUR"), "EUR 0.99");
    }

    #[test]
    fn test_missing_fraction() {
        assert_eq!(format_as_price("1500", "USD"), "USD 1,500.00");
        assert_eq!(format_as_price("1500.", "USD"), "USD 1,500.00");
    }

    #[test]
    fn test_missing_integer_part() {
        assert_eq!(format_as_price(".5", "USD"), "USD 0.50");
    }

    #[test]
    fn test_negative_below_one() {
        assert_eq!(format_as_price("-0.5", "GBP"), "-GBP 0.50");
    }

    #[test]
    fn test_grouping_boundaries() {
        assert_eq!(format_as_price("999", "GBP"), "GBP 999.00");
        assert_eq!(format_as_price("1000", "GBP"), "GBP 1,000.00");
        assert_eq!(format_as_price("-1234567.8", "GBP"), "-GBP 1,234,567.80");
    }

    #[test]
    fn test_amount_beyond_decimal_range_keeps_sign_and_digits() {
        let raw = "-123456789012345678901234567890.55";
        let expected = "-GBP 123,456,789,012,345,678,901,234,567,890.55";
        assert_eq!(format_as_price(raw, "GBP"), expected);
        assert_eq!(try_format_as_price(raw, "GBP").unwrap(), expected);
    }

    #[test]
    fn test_leading_zeros_and_negative_zero() {
        assert_eq!(format_as_price("0001234.5", "GBP"), "GBP 1,234.50");
        assert_eq!(format_as_price("-0.00", "GBP"), "GBP 0.00");
        assert_eq!(format_as_price("-.5", "GBP"), "-GBP 0.50");
    }

    #[test]
    fn test_scientific_notation_falls_back_to_decimal() {
        assert_eq!(format_as_price("-1e3", "GBP"), "-GBP 1,000.00");
    }

    #[test]
    fn test_malformed_amount_shows_zero() {
        assert_eq!(format_as_price("abc", "GBP"), "GBP 0.00");
        assert_eq!(format_as_price("", "GBP"), "GBP 0.00");
    }

    #[test]
    fn test_strict_variant_rejects_malformed() {
        assert!(matches!(
            try_format_as_price("12,50", "GBP"),
            Err(Error::InvalidAmount(_))
        ));
        assert!(try_format_as_price("", "GBP").is_err());
        assert_eq!(try_format_as_price("-10.4", "GBP").unwrap(), "-GBP 10.40");
    }

    #[test]
    fn test_format_decimal_amount() {
        assert_eq!(format_amount(Decimal::new(482347, 2), "USD"), "USD 4,823.47");
        assert_eq!(format_amount(Decimal::new(-1040, 2), "GBP"), "-GBP 10.40");
    }

    #[test]
    fn test_money_display_uppercases_code() {
        let money = Money::new(Decimal::new(1875000, 2), "gbp");
        assert_eq!(money.currency_code, "gbp");
        assert_eq!(money.display(), "GBP 18,750.00");
        assert!(!money.is_negative());
    }
}
