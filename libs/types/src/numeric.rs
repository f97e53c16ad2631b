//! Exact numeric types for prices and quantities
//!
//! Prices use rust_decimal for exact fixed-point arithmetic (no binary
//! floating point anywhere near money). Quantities are whole units.
//!
//! Neither type enforces positivity at construction: an order carrying a
//! zero price or zero units must be representable so the validator can
//! reject it with a reply instead of a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price with exact fixed-point decimal representation
///
/// All comparisons are exact; there is no epsilon tolerance. Serialized as
/// a string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price from a Decimal
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create from an integer
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether the price is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Decimal::from_str(s)?))
    }
}

// Serialized as a string to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Ok(Self(decimal))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-unit order quantity
///
/// Resting quantities decrease monotonically as fills execute; a residual
/// reaching zero is removed from the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Units(u64);

impl Units {
    /// Create a new Units value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner integer value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Whether the quantity is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract a fill from this quantity
    ///
    /// # Panics
    /// Panics if `fill` exceeds the current quantity; a fill is always
    /// capped at `min` of the two residuals before this is called.
    pub fn minus(self, fill: Units) -> Units {
        assert!(
            fill.0 <= self.0,
            "fill of {} units exceeds remaining {}",
            fill.0,
            self.0
        );
        Units(self.0 - fill.0)
    }
}

impl From<u64> for Units {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
