//! Cart Calc Core - Shared value types.
//!
//! This crate provides the validated value types used by every Cart Calc
//! component:
//! - `store` - Cart and shopping list state containers with persistence
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access. Every
//! constructor validates its input, so a value of one of these types always
//! satisfies its invariant (non-empty names, positive quantities and prices).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item ids, names, quantities and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
