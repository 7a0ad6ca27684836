//! Core types for Cart Calc.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod name;
pub mod price;
pub mod quantity;

pub use id::*;
pub use name::{ItemName, ItemNameError};
pub use price::{CurrencyCode, Price, PriceError};
pub use quantity::{Quantity, QuantityError};
