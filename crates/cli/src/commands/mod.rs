//! Command implementations.
//!
//! Each command validates its raw arguments with the core value types plus
//! the entry-form minimums (quantity at least 1, price at least 0.01),
//! applies the operation to a store and returns the text to print.

pub mod cart;
pub mod list;

use cart_calc_core::{IdError, ItemNameError, Price, PriceError, Quantity, QuantityError};
use cart_calc_store::{ConfigError, StorageError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid item name.
    #[error("Invalid name: {0}")]
    Name(#[from] ItemNameError),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// Invalid price.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Quantity below the entry minimum.
    #[error("Invalid quantity: must be at least {0}")]
    QuantityBelowMinimum(Decimal),

    /// Price below the entry minimum.
    #[error("Invalid price: must be at least {0}")]
    PriceBelowMinimum(Decimal),

    /// Invalid item reference.
    #[error("Invalid item reference: {0}")]
    Reference(#[from] IdError),
}

/// Smallest quantity accepted on input.
fn min_quantity() -> Decimal {
    Decimal::ONE
}

/// Smallest unit price accepted on input.
fn min_price() -> Decimal {
    Decimal::new(1, 2)
}

/// Parse a quantity entered by the user.
fn parse_quantity(s: &str) -> Result<Quantity, CliError> {
    let quantity = Quantity::parse(s)?;
    if quantity.as_decimal() < min_quantity() {
        return Err(CliError::QuantityBelowMinimum(min_quantity()));
    }
    Ok(quantity)
}

/// Parse a unit price entered by the user.
fn parse_price(s: &str) -> Result<Price, CliError> {
    let price = Price::parse(s)?;
    if price.amount() < min_price() {
        return Err(CliError::PriceBelowMinimum(min_price()));
    }
    Ok(price)
}

/// Resolve an item reference to an id.
///
/// A reference is either an item id or a 1-based position as listed by
/// `show` (optionally prefixed with `#`). Exact ids win over positions.
/// Anything else is taken as an id, which the store treats as absent.
fn resolve_reference<I>(ids: &[&I], reference: &str) -> Result<I, IdError>
where
    I: Clone + AsRef<str> + std::str::FromStr<Err = IdError>,
{
    let reference = reference.trim();
    if let Some(id) = ids.iter().find(|id| AsRef::<str>::as_ref(**id) == reference) {
        return Ok((*id).clone());
    }

    let position = reference
        .strip_prefix('#')
        .unwrap_or(reference)
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| ids.get(index));
    match position {
        Some(id) => Ok((*id).clone()),
        None => reference.parse(),
    }
}

/// Message printed when a reference matched nothing.
const NO_MATCH: &str = "No matching item; nothing changed.";
