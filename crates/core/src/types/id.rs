//! Newtype IDs for type-safe item references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing cart item IDs with shopping list item IDs.

use thiserror::Error;

/// Errors that can occur when parsing an item ID.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Generate a new time-ordered unique id string.
///
/// UUID v7: a 48-bit millisecond timestamp followed by random bits.
#[must_use]
pub fn generate_id_string() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around an opaque `String` with:
/// - `Serialize`/`Deserialize` as a plain string (empty strings are rejected)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `generate()` for fresh ids, `parse()` for ids supplied as text
/// - `Display`, `FromStr` and `AsRef<str>` implementations
///
/// Ids restored from storage are not required to be UUIDs; any non-empty
/// string is accepted so that older snapshots survive.
///
/// # Example
///
/// ```rust
/// # use cart_calc_core::define_id;
/// define_id!(OrderLineId);
/// define_id!(WishlistId);
///
/// let line = OrderLineId::generate();
/// let wish = WishlistId::parse("wish-1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: OrderLineId = wish;
/// # let _ = (line, wish);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::generate_id_string())
            }

            /// Parse an ID from text.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty or whitespace.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define item IDs
define_id!(CartItemId);
define_id!(ListItemId);
