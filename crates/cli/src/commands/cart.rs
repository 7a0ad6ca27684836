//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cart-calc cart add Milk -q 2 -p 3.50
//! cart-calc cart edit 1 --price 3.20
//! cart-calc cart remove 1
//! cart-calc cart show
//! ```

use std::fmt::Write as _;

use cart_calc_core::{CartItemId, CurrencyCode, ItemName};
use cart_calc_store::{CartItemUpdate, CartStore};

use super::{CliError, NO_MATCH, parse_price, parse_quantity, resolve_reference};

/// Add a line item.
///
/// # Errors
///
/// Returns an error if the name, quantity or price is invalid.
pub fn add(
    cart: &mut CartStore,
    currency: CurrencyCode,
    name: &str,
    quantity: &str,
    price: &str,
) -> Result<String, CliError> {
    let name = ItemName::parse(name)?;
    let quantity = parse_quantity(quantity)?;
    let price = parse_price(price)?;

    let label = name.to_string();
    let id = cart.add_item(name, quantity, price);
    Ok(format!(
        "Added {label} ({id}). Total: {}",
        currency.format(cart.total())
    ))
}

/// Edit the fields given for one line item.
///
/// # Errors
///
/// Returns an error if the reference or a new value is invalid.
pub fn edit(
    cart: &mut CartStore,
    currency: CurrencyCode,
    reference: &str,
    name: Option<&str>,
    quantity: Option<&str>,
    price: Option<&str>,
) -> Result<String, CliError> {
    let id = resolve(cart, reference)?;
    let update = CartItemUpdate {
        name: name.map(ItemName::parse).transpose()?,
        quantity: quantity.map(parse_quantity).transpose()?,
        price: price.map(parse_price).transpose()?,
    };

    if cart.edit_item(&id, update) {
        Ok(format!("Updated {id}. Total: {}", currency.format(cart.total())))
    } else {
        Ok(NO_MATCH.to_owned())
    }
}

/// Remove one line item.
///
/// # Errors
///
/// Returns an error if the reference is empty.
pub fn remove(
    cart: &mut CartStore,
    currency: CurrencyCode,
    reference: &str,
) -> Result<String, CliError> {
    let id = resolve(cart, reference)?;
    if cart.remove_item(&id) {
        Ok(format!("Removed {id}. Total: {}", currency.format(cart.total())))
    } else {
        Ok(NO_MATCH.to_owned())
    }
}

/// Remove every line item.
pub fn clear(cart: &mut CartStore) -> String {
    let removed = cart.len();
    cart.clear_cart();
    format!("Cart cleared ({removed} removed).")
}

/// Render the cart: one line per item, then the total.
#[must_use]
pub fn show(cart: &CartStore, currency: CurrencyCode) -> String {
    let mut out = String::new();
    if cart.is_empty() {
        out.push_str("Cart is empty.\n");
    } else {
        for (position, item) in cart.items().iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {} {} × {} = {}  [{}]",
                position + 1,
                item.name,
                item.quantity,
                currency.format(item.price.amount()),
                currency.format(item.line_total()),
                item.id,
            );
        }
        let _ = writeln!(out, "Items: {}", cart.item_count().normalize());
    }
    let _ = write!(out, "Total: {}", currency.format(cart.total()));
    out
}

fn resolve(cart: &CartStore, reference: &str) -> Result<CartItemId, CliError> {
    let ids: Vec<&CartItemId> = cart.items().iter().map(|item| &item.id).collect();
    Ok(resolve_reference(&ids, reference)?)
}
