//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::quantity::{Quantity, parse_decimal};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a number.
    #[error("price is not a number: {0}")]
    Invalid(String),
    /// The value is zero or negative.
    #[error("price must be positive")]
    NotPositive,
    /// The value exceeds the allowed maximum.
    #[error("price must be at most {max}")]
    TooLarge {
        /// Maximum allowed price.
        max: u64,
    },
}

/// A positive unit price in the currency's standard unit (e.g. reais, not
/// centavos).
///
/// Persists as a plain JSON number (an `f64`), so new prices are capped and
/// rounded to [`Self::SCALE`] places to keep the round trip exact. Restored
/// prices only need to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// The largest unit price accepted.
    pub const MAX: u64 = 1_000_000_000;

    /// Decimal places kept for new prices.
    pub const SCALE: u32 = 4;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount, rounded to [`Self::SCALE`] places, is
    /// not positive or exceeds [`Self::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let amount = amount.round_dp(Self::SCALE);
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount > Decimal::from(Self::MAX) {
            return Err(PriceError::TooLarge { max: Self::MAX });
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse a price from text such as `"3.50"` or `"3,50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number, or not a valid price.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = parse_decimal(s).ok_or_else(|| PriceError::Invalid(s.trim().to_owned()))?;
        Self::new(amount)
    }

    /// Create a price from an amount in the smallest currency unit.
    ///
    /// # Errors
    ///
    /// Returns an error if `cents` is not positive.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Accept a previously stored price. Only positivity is checked.
    fn from_stored(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount.normalize()))
    }

    /// Get the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: Quantity) -> Decimal {
        self.0 * quantity.as_decimal()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_cents_precision(self.0))
    }
}

/// Round half away from zero to two places and pad to exactly two places.
fn to_cents_precision(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::from_stored(amount).map_err(serde::de::Error::custom)
    }
}

/// ISO 4217 currency codes used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Format an amount for display, rounded to two decimal places.
    ///
    /// Reais use Brazilian separators (`R$ 1.234,50`); the others use
    /// `$1,234.50` style.
    ///
    /// ```
    /// use cart_calc_core::CurrencyCode;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(CurrencyCode::BRL.format(Decimal::new(123450, 2)), "R$ 1.234,50");
    /// assert_eq!(CurrencyCode::USD.format(Decimal::new(1200, 2)), "$12.00");
    /// ```
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let (group_sep, decimal_sep, spacer) = match self {
            Self::BRL => ('.', ',', " "),
            Self::USD | Self::EUR | Self::GBP => (',', '.', ""),
        };

        let rounded = to_cents_precision(amount.abs()).to_string();
        let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(digit);
        }

        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{sign}{}{spacer}{grouped}{decimal_sep}{fraction}",
            self.symbol()
        )
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}
