//! Monetary amount of a cart line.
//!
//! A line price is the *total* for the line (unit price × quantity), not a
//! unit price. It is carried through the cart service untouched; computing
//! it is the caller's job.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total price of a cart line.
///
/// Serializes as a JSON number (e.g. `19.98`) and accepts either a number
/// or a decimal string when deserializing. Arithmetic stays in `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinePrice(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl LinePrice {
    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for LinePrice {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<LinePrice> for Decimal {
    fn from(price: LinePrice) -> Self {
        price.0
    }
}

impl fmt::Display for LinePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_price_accepts_json_number() {
        let price: LinePrice = serde_json::from_str("19.98").unwrap();
        assert_eq!(price.amount(), Decimal::new(1998, 2));
    }

    #[test]
    fn test_line_price_accepts_json_string() {
        let price: LinePrice = serde_json::from_str("\"5.00\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(500, 2));
    }

    #[test]
    fn test_line_price_serializes_as_number() {
        let json = serde_json::to_value(LinePrice::new(Decimal::new(1998, 2))).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "19.98");
    }

    #[test]
    fn test_line_price_display() {
        assert_eq!(LinePrice::new(Decimal::new(5, 0)).to_string(), "5.00");
    }
}
