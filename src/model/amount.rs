//! Amount type for monetary values submitted as text.
//!
//! Submissions come from phones and spreadsheets, so the parser tolerates a leading dollar sign
//! and a decimal comma. The value is always written back with exactly two decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Number of decimals an amount is written with.
const PRECISION: u32 = 2;

/// Represents an expense amount.
///
/// The parsed value is kept as-is. Rounding (half-to-even) only happens when the amount is
/// displayed, so a value like `-0.001` is still negative even though it would print as `0.00`.
///
/// # Examples
///
/// ```
/// # use expense_sheet::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("100").unwrap();
/// assert_eq!(amount.to_string(), "100.00");
///
/// let amount = Amount::from_str("12,5").unwrap();
/// assert_eq!(amount.to_string(), "12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is strictly below zero. Negative zero is not negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// The value rounded to two decimals with the scale fixed at two.
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self.value.round_dp(PRECISION);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(PRECISION);
        rounded
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
}

impl AmountError {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmountError")
            .field("input", &self.input)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(e) => write!(f, "'{}' is not a number: {e}", self.input),
            None => write!(f, "'{}' is not a number", self.input),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
            });
        }

        // Drop a dollar sign: "$50", "-$50"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // A comma is a decimal separator: "12,5" is twelve and a half
        let normalized = without_dollar.replace(',', ".");

        let value = Decimal::from_str(&normalized).map_err(|e| AmountError {
            input: s.to_string(),
            source: Some(e),
        })?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.rounded(), f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("100.00").unwrap();
        assert_eq!(amount.value(), dec("100"));
        assert_eq!(amount.to_string(), "100.00");
    }

    #[test]
    fn test_parse_integer_gets_two_decimals() {
        assert_eq!(Amount::from_str("100").unwrap().to_string(), "100.00");
        assert_eq!(Amount::from_str("7.5").unwrap().to_string(), "7.50");
    }

    #[test]
    fn test_parse_decimal_comma() {
        let amount = Amount::from_str("12,5").unwrap();
        assert_eq!(amount.value(), dec("12.5"));
        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        assert_eq!(Amount::from_str("$40").unwrap().value(), dec("40"));
        assert_eq!(Amount::from_str("-$40").unwrap().value(), dec("-40"));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  15.25 ").unwrap();
        assert_eq!(amount.to_string(), "15.25");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
        assert!(Amount::from_str("1.000,50").is_err());
    }

    #[test]
    fn test_error_names_input() {
        let e = Amount::from_str("abc").unwrap_err();
        assert_eq!(e.input(), "abc");
        assert!(e.to_string().contains("'abc'"));
    }

    #[test]
    fn test_rounding_is_half_even() {
        assert_eq!(Amount::from_str("1.005").unwrap().to_string(), "1.00");
        assert_eq!(Amount::from_str("1.015").unwrap().to_string(), "1.02");
        assert_eq!(Amount::from_str("2.499").unwrap().to_string(), "2.50");
    }

    #[test]
    fn test_negative() {
        assert!(Amount::from_str("-10").unwrap().is_negative());
        assert!(Amount::from_str("-0.001").unwrap().is_negative());
        assert!(!Amount::from_str("0").unwrap().is_negative());
        assert!(!Amount::from_str("-0").unwrap().is_negative());
    }

    #[test]
    fn test_zero_displays_unsigned() {
        assert_eq!(Amount::from_str("-0").unwrap().to_string(), "0.00");
        assert!(Amount::from_str("0.00").unwrap().is_zero());
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::new(dec("50"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"50.00\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"50,10\"").unwrap();
        assert_eq!(amount.value(), dec("50.10"));
    }
}
