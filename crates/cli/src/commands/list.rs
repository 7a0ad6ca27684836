//! Shopping list commands.
//!
//! # Usage
//!
//! ```bash
//! cart-calc list add Eggs -q 12
//! cart-calc list toggle 1
//! cart-calc list clear --completed
//! cart-calc list show
//! ```

use std::fmt::Write as _;

use cart_calc_core::{ItemName, ListItemId};
use cart_calc_store::{ShoppingListItemUpdate, ShoppingListStore};

use super::{CliError, NO_MATCH, parse_quantity, resolve_reference};

/// Add an item to the list.
///
/// # Errors
///
/// Returns an error if the name or quantity is invalid.
pub fn add(list: &mut ShoppingListStore, name: &str, quantity: &str) -> Result<String, CliError> {
    let name = ItemName::parse(name)?;
    let quantity = parse_quantity(quantity)?;

    let label = name.to_string();
    let id = list.add_item(name, quantity);
    Ok(format!("Added {label} ({id}). Progress: {}", list.progress()))
}

/// Edit the fields given for one item.
///
/// # Errors
///
/// Returns an error if the reference or a new value is invalid.
pub fn edit(
    list: &mut ShoppingListStore,
    reference: &str,
    name: Option<&str>,
    quantity: Option<&str>,
    completed: Option<bool>,
) -> Result<String, CliError> {
    let id = resolve(list, reference)?;
    let update = ShoppingListItemUpdate {
        name: name.map(ItemName::parse).transpose()?,
        quantity: quantity.map(parse_quantity).transpose()?,
        completed,
    };

    if list.edit_item(&id, update) {
        Ok(format!("Updated {id}."))
    } else {
        Ok(NO_MATCH.to_owned())
    }
}

/// Flip the completed flag of one item.
///
/// # Errors
///
/// Returns an error if the reference is empty.
pub fn toggle(list: &mut ShoppingListStore, reference: &str) -> Result<String, CliError> {
    let id = resolve(list, reference)?;
    if !list.toggle_item(&id) {
        return Ok(NO_MATCH.to_owned());
    }

    let status = match list.get(&id) {
        Some(item) if item.completed => "done",
        _ => "to buy",
    };
    Ok(format!("Marked {id} as {status}. Progress: {}", list.progress()))
}

/// Remove one item.
///
/// # Errors
///
/// Returns an error if the reference is empty.
pub fn remove(list: &mut ShoppingListStore, reference: &str) -> Result<String, CliError> {
    let id = resolve(list, reference)?;
    if list.remove_item(&id) {
        Ok(format!("Removed {id}."))
    } else {
        Ok(NO_MATCH.to_owned())
    }
}

/// Remove every item, or only the completed ones.
pub fn clear(list: &mut ShoppingListStore, completed_only: bool) -> String {
    if completed_only {
        let removed = list.clear_completed();
        format!("Removed {removed} completed item(s).")
    } else {
        let removed = list.len();
        list.clear_list();
        format!("Shopping list cleared ({removed} removed).")
    }
}

/// Render the list with a checkbox per item, then the progress.
#[must_use]
pub fn show(list: &ShoppingListStore) -> String {
    let mut out = String::new();
    if list.is_empty() {
        out.push_str("Shopping list is empty.\n");
    }
    for (position, item) in list.items().iter().enumerate() {
        let mark = if item.completed { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "{:>3}. [{mark}] {} × {}  [{}]",
            position + 1,
            item.name,
            item.quantity,
            item.id,
        );
    }
    let _ = write!(out, "Progress: {}", list.progress());
    out
}

fn resolve(list: &ShoppingListStore, reference: &str) -> Result<ListItemId, CliError> {
    let ids: Vec<&ListItemId> = list.items().iter().map(|item| &item.id).collect();
    Ok(resolve_reference(&ids, reference)?)
}
