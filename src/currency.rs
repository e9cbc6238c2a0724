//! Locale-aware conversion between formatted amount strings and decimals.
//!
//! Formatting zero yields an empty string and parsing an empty string yields
//! `None`, so a zero amount reads back as unset on the next round trip.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("decimal and thousands separators must differ (both '{0}')")]
    SameSeparators(char),

    #[error("'{0}' cannot be used as a separator")]
    InvalidSeparator(char),

    #[error("fraction digits must be at most 8, got {0}")]
    TooManyFractionDigits(u32),
}

/// Separators and precision used to render and read monetary amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleFormat {
    pub decimal_separator: char,
    pub thousands_separator: char,
    pub fraction_digits: u32,
}

impl Default for LocaleFormat {
    /// Dutch notation: `1.234,56`.
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separator: '.',
            fraction_digits: 2,
        }
    }
}

impl LocaleFormat {
    pub fn new(
        decimal_separator: char,
        thousands_separator: char,
        fraction_digits: u32,
    ) -> Result<Self, LocaleError> {
        if decimal_separator == thousands_separator {
            return Err(LocaleError::SameSeparators(decimal_separator));
        }
        for sep in [decimal_separator, thousands_separator] {
            if sep.is_ascii_digit() || sep == '-' || sep == '+' {
                return Err(LocaleError::InvalidSeparator(sep));
            }
        }
        if fraction_digits > 8 {
            return Err(LocaleError::TooManyFractionDigits(fraction_digits));
        }

        Ok(Self {
            decimal_separator,
            thousands_separator,
            fraction_digits,
        })
    }

    /// Parse a formatted amount such as `"1.234,56"`.
    ///
    /// Returns `None` for blank or unparseable input; callers treat that as
    /// "value unset", not as an error.
    pub fn parse(&self, input: &str) -> Option<Decimal> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        Decimal::from_str(&normalized).ok()
    }

    /// Render an amount with exactly `fraction_digits` decimals and grouped
    /// thousands. `None` and zero render as an empty string.
    pub fn format(&self, value: Option<Decimal>) -> String {
        let value = match value {
            Some(v) if !v.is_zero() => v,
            _ => return String::new(),
        };

        let mut rounded = value.round_dp_with_strategy(
            self.fraction_digits,
            RoundingStrategy::MidpointAwayFromZero,
        );
        rounded.rescale(self.fraction_digits);

        let negative = rounded.is_sign_negative();
        let plain = rounded.abs().to_string();
        let (integer, fraction) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };

        let mut out = String::with_capacity(plain.len() + integer.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(integer, self.thousands_separator));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_dutch_notation() {
        let nl = LocaleFormat::default();
        assert_eq!(nl.parse("1.234,56"), Some(dec("1234.56")));
        assert_eq!(nl.parse("  12,5 "), Some(dec("12.5")));
        assert_eq!(nl.parse("1.234.567"), Some(dec("1234567")));
        assert_eq!(nl.parse("0,00"), Some(Decimal::ZERO));
    }

    #[test]
    fn parse_blank_or_garbage_is_none() {
        let nl = LocaleFormat::default();
        assert_eq!(nl.parse(""), None);
        assert_eq!(nl.parse("   "), None);
        assert_eq!(nl.parse("abc"), None);
        assert_eq!(nl.parse("12,3,4"), None);
    }

    #[test]
    fn format_dutch_notation() {
        let nl = LocaleFormat::default();
        assert_eq!(nl.format(Some(dec("1234.56"))), "1.234,56");
        assert_eq!(nl.format(Some(dec("1234567.8"))), "1.234.567,80");
        assert_eq!(nl.format(Some(dec("0.5"))), "0,50");
        assert_eq!(nl.format(Some(dec("999"))), "999,00");
        assert_eq!(nl.format(Some(dec("-1234.5"))), "-1.234,50");
        assert_eq!(nl.format(Some(dec("2.345"))), "2,35");
    }

    #[test]
    fn zero_and_none_format_blank() {
        let nl = LocaleFormat::default();
        assert_eq!(nl.format(None), "");
        assert_eq!(nl.format(Some(Decimal::ZERO)), "");
        assert_eq!(nl.format(Some(dec("0.00"))), "");
    }

    #[test]
    fn format_always_has_two_fraction_digits() {
        let nl = LocaleFormat::default();
        for raw in ["1", "10.1", "100.12", "0.01", "123456789.99", "7.005"] {
            let formatted = nl.format(Some(dec(raw)));
            let (_, fraction) = formatted.split_once(',').unwrap();
            assert_eq!(fraction.len(), 2, "{raw} -> {formatted}");
        }
    }

    #[test]
    fn round_trip_non_zero_values() {
        let nl = LocaleFormat::default();
        for raw in ["0.01", "1", "12.34", "1234.56", "1000000", "98765432.10"] {
            let x = dec(raw);
            assert_eq!(nl.parse(&nl.format(Some(x))), Some(x), "{raw}");
        }
    }

    #[test]
    fn round_trip_zero_becomes_none() {
        let nl = LocaleFormat::default();
        assert_eq!(nl.parse(&nl.format(Some(Decimal::ZERO))), None);
        assert_eq!(nl.parse(&nl.format(None)), None);
    }

    #[test]
    fn english_locale() {
        let en = LocaleFormat::new('.', ',', 2).unwrap();
        assert_eq!(en.format(Some(dec("1234.5"))), "1,234.50");
        assert_eq!(en.parse("1,234.50"), Some(dec("1234.5")));
    }

    #[test]
    fn rejects_bad_locale() {
        assert_eq!(
            LocaleFormat::new(',', ',', 2),
            Err(LocaleError::SameSeparators(','))
        );
        assert_eq!(
            LocaleFormat::new('1', '.', 2),
            Err(LocaleError::InvalidSeparator('1'))
        );
        assert!(LocaleFormat::new(',', '.', 12).is_err());
    }

    #[test]
    fn zero_fraction_digits() {
        let whole = LocaleFormat::new(',', '.', 0).unwrap();
        assert_eq!(whole.format(Some(dec("1234.5"))), "1.235");
    }
}
