//! Item quantity type.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a number.
    #[error("quantity is not a number: {0}")]
    Invalid(String),
    /// The value is zero or negative.
    #[error("quantity must be positive")]
    NotPositive,
    /// The value exceeds the allowed maximum.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// A positive item quantity.
///
/// Quantities are decimal so that weighed goods (`1.5` kg) are representable.
/// They persist as plain JSON numbers (an `f64`), so new quantities are capped
/// and rounded to [`Self::SCALE`] places to keep the round trip exact.
/// Restored quantities only need to be positive.
///
/// ```
/// use cart_calc_core::Quantity;
///
/// assert_eq!(Quantity::parse("2").unwrap().to_string(), "2");
/// assert_eq!(Quantity::parse("1,5").unwrap().to_string(), "1.5");
/// assert!(Quantity::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quantity(Decimal);

impl Quantity {
    /// The largest quantity accepted.
    pub const MAX: u32 = 1_000_000;

    /// Decimal places kept for new quantities.
    pub const SCALE: u32 = 3;

    /// A quantity of one.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Create a quantity from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value, rounded to [`Self::SCALE`] places, is
    /// not positive or exceeds [`Self::MAX`].
    pub fn new(value: Decimal) -> Result<Self, QuantityError> {
        let value = value.round_dp(Self::SCALE);
        if value <= Decimal::ZERO {
            return Err(QuantityError::NotPositive);
        }
        if value > Decimal::from(Self::MAX) {
            return Err(QuantityError::TooLarge { max: Self::MAX });
        }
        Ok(Self(value.normalize()))
    }

    /// Parse a quantity from text. A lone comma is accepted as the decimal
    /// separator.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number, or not a valid quantity.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let value = parse_decimal(s).ok_or_else(|| QuantityError::Invalid(s.trim().to_owned()))?;
        Self::new(value)
    }

    /// Create a quantity from a whole number.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is zero or exceeds [`Self::MAX`].
    pub fn from_u32(value: u32) -> Result<Self, QuantityError> {
        Self::new(Decimal::from(value))
    }

    /// Accept a previously stored quantity. Only positivity is checked.
    fn from_stored(value: Decimal) -> Result<Self, QuantityError> {
        if value <= Decimal::ZERO {
            return Err(QuantityError::NotPositive);
        }
        Ok(Self(value.normalize()))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

/// Parse decimal text, treating a single comma as the decimal separator when
/// no dot is present (`"3,50"`).
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let normalized = if trimmed.contains('.') || trimmed.matches(',').count() != 1 {
        trimmed.to_owned()
    } else {
        trimmed.replace(',', ".")
    };
    normalized.parse::<Decimal>().ok()
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::from_stored(value).map_err(serde::de::Error::custom)
    }
}
