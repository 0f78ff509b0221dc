//! Amount type for handling the monetary value of a spending record.
//!
//! Amounts are non-negative in practice (the journal rejects anything else), but the type itself
//! does not enforce this so that hand-edited or seed data can still be loaded and reported on.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents a spending amount.
///
/// Parsing accepts an optional leading currency symbol (any non-numeric prefix such as `$` or
/// `฿`) and commas as thousands separators.
///
/// ```
/// # use spendlog::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("฿1,250.50").unwrap();
/// let b = Amount::from_str("1250.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Formats the amount with thousands separators and the given currency symbol, e.g.
    /// `฿60,000.00`.
    pub fn display_with(&self, symbol: &str) -> String {
        let sign = if self.0.is_sign_negative() && !self.is_zero() {
            "-"
        } else {
            ""
        };
        let num = self.0.abs().to_f64().unwrap_or_default();
        format!("{sign}{symbol}{}", format_num::format_num!(",.2", num))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        // Drop a currency symbol of any width
        let digits = rest.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.');
        let without_commas = digits.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

/// Rounds to cents. Use `Serialize` for the exact value.
impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Exact, with trailing zeros stripped, so stored amounts are never rounded
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Accepts amounts written as JSON numbers (as in the bundled seed data) or as strings.
struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Amount, E>
    where
        E: serde::de::Error,
    {
        Amount::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Amount, E>
    where
        E: serde::de::Error,
    {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Amount, E>
    where
        E: serde::de::Error,
    {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Amount, E>
    where
        E: serde::de::Error,
    {
        Decimal::from_f64(v)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("{v} cannot be represented as an amount")))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
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
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50"));
    }

    #[test]
    fn test_parse_with_currency_symbols() {
        assert_eq!(Amount::from_str("$50.00").unwrap().value(), dec("50"));
        assert_eq!(Amount::from_str("฿50.00").unwrap().value(), dec("50"));
        assert_eq!(Amount::from_str("-$50.00").unwrap().value(), dec("-50"));
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(Amount::from_str("  ").unwrap().is_zero());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("lunch").is_err());
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Amount::new(dec("5")).to_string(), "5.00");
        assert_eq!(Amount::new(dec("5.5")).to_string(), "5.50");
        assert_eq!(Amount::new(dec("5.25")).to_string(), "5.25");
        assert_eq!(Amount::new(dec("5.256")).to_string(), "5.26");
    }

    #[test]
    fn test_display_with_symbol() {
        let amount = Amount::new(dec("60000"));
        assert_eq!(amount.display_with("฿"), "฿60,000.00");
        assert_eq!(Amount::ZERO.display_with("$"), "$0.00");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Amount = serde_json::from_str("120.5").unwrap();
        let b: Amount = serde_json::from_str("\"120.50\"").unwrap();
        let c: Amount = serde_json::from_str("120").unwrap();
        assert_eq!(a.value(), dec("120.5"));
        assert_eq!(b.value(), dec("120.5"));
        assert_eq!(c.value(), dec("120"));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Amount::new(dec("150.00"))).unwrap();
        assert_eq!(json, "\"150\"");
        let json = serde_json::to_string(&Amount::new(dec("120.50"))).unwrap();
        assert_eq!(json, "\"120.5\"");
    }

    #[test]
    fn test_serialize_keeps_sub_cent_digits() {
        for s in ["0.004", "12.345", "-3.1415"] {
            let amount = Amount::from_str(s).unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(json, format!("\"{s}\""));
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(back, amount);
        }
    }

    #[test]
    fn test_sum() {
        let total: Amount = [dec("1.10"), dec("2.20")]
            .into_iter()
            .map(Amount::new)
            .sum();
        assert_eq!(total.value(), dec("3.30"));
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::from_str("0.01").unwrap().is_positive());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::from_str("-1").unwrap().is_positive());
    }
}
