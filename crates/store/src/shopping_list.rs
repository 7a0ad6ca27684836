//! Shopping list store.
//!
//! A checklist of things to buy. Persisted under `shopping-list-storage` as
//! `{ "items": [{id, name, quantity, completed}] }`. Progress (completed vs.
//! total) is computed on demand and never stored.

use std::collections::HashSet;
use std::fmt;

use cart_calc_core::{ItemName, ListItemId, Quantity};
use serde::{Deserialize, Serialize};

use crate::persist::Persister;
use crate::store::{Hydration, PersistedState, SnapshotError, StateListener, Store};

/// A checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: ListItemId,
    pub name: ItemName,
    pub quantity: Quantity,
    #[serde(default)]
    pub completed: bool,
}

/// Field updates for [`ShoppingListStore::edit_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingListItemUpdate {
    pub name: Option<ItemName>,
    pub quantity: Option<Quantity>,
    pub completed: Option<bool>,
}

impl ShoppingListItemUpdate {
    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.completed.is_none()
    }

    fn apply(self, item: &mut ShoppingListItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

/// Completed vs. total item counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListProgress {
    pub completed: usize,
    pub total: usize,
}

impl ListProgress {
    /// Returns `true` if the list is non-empty and every item is completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl fmt::Display for ListProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Shopping list contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShoppingListSnapshot")]
pub struct ShoppingListState {
    items: Vec<ShoppingListItem>,
}

#[derive(Deserialize)]
struct ShoppingListSnapshot {
    items: Vec<ShoppingListItem>,
}

impl TryFrom<ShoppingListSnapshot> for ShoppingListState {
    type Error = SnapshotError;

    fn try_from(snapshot: ShoppingListSnapshot) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(snapshot.items.len());
        for item in &snapshot.items {
            if !seen.insert(&item.id) {
                return Err(SnapshotError::DuplicateId(item.id.to_string()));
            }
        }
        Ok(Self {
            items: snapshot.items,
        })
    }
}

impl ShoppingListState {
    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    fn contains(&self, id: &ListItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    fn find_mut(&mut self, id: &ListItemId) -> Option<&mut ShoppingListItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl PersistedState for ShoppingListState {
    const STORAGE_KEY: &'static str = "shopping-list-storage";

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// The shopping list.
#[derive(Debug, Default)]
pub struct ShoppingListStore {
    store: Store<ShoppingListState>,
}

impl ShoppingListStore {
    /// Create an empty, unhydrated list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, not yet completed item and return its generated id.
    pub fn add_item(&mut self, name: ItemName, quantity: Quantity) -> ListItemId {
        self.store.update(|state| {
            let mut id = ListItemId::generate();
            while state.contains(&id) {
                id = ListItemId::generate();
            }

            tracing::debug!(item_id = %id, name = %name, "list item added");
            state.items.push(ShoppingListItem {
                id: id.clone(),
                name,
                quantity,
                completed: false,
            });
            id
        })
    }

    /// Remove the item with `id`. Returns `false` (a no-op) if it is absent.
    pub fn remove_item(&mut self, id: &ListItemId) -> bool {
        self.store.update_if(|state| {
            let before = state.items.len();
            state.items.retain(|item| &item.id != id);
            let removed = state.items.len() != before;
            tracing::debug!(item_id = %id, removed, "list item remove");
            removed
        })
    }

    /// Flip the completed flag of the item with `id`. Returns `false` (a
    /// no-op) if it is absent.
    pub fn toggle_item(&mut self, id: &ListItemId) -> bool {
        self.store.update_if(|state| {
            let Some(item) = state.find_mut(id) else {
                tracing::debug!(item_id = %id, "list item not found, nothing toggled");
                return false;
            };
            item.completed = !item.completed;
            tracing::debug!(item_id = %id, completed = item.completed, "list item toggled");
            true
        })
    }

    /// Apply `update` to the item with `id`, keeping its id. Returns `false`
    /// (a no-op) if it is absent.
    pub fn edit_item(&mut self, id: &ListItemId, update: ShoppingListItemUpdate) -> bool {
        self.store.update_if(|state| {
            let Some(item) = state.find_mut(id) else {
                tracing::debug!(item_id = %id, "list item not found, nothing edited");
                return false;
            };
            update.apply(item);
            tracing::debug!(item_id = %id, "list item edited");
            true
        })
    }

    /// Remove every item.
    pub fn clear_list(&mut self) {
        self.store.update(|state| state.items.clear());
        tracing::debug!("shopping list cleared");
    }

    /// Remove only the completed items. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let mut removed = 0;
        self.store.update_if(|state| {
            let before = state.items.len();
            state.items.retain(|item| !item.completed);
            removed = before - state.items.len();
            removed > 0
        });
        tracing::debug!(removed, "completed list items cleared");
        removed
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        self.store.state().items()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ListItemId) -> Option<&ShoppingListItem> {
        self.items().iter().find(|item| &item.id == id)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Returns `true` if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Number of completed items, counted from the current items.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items().iter().filter(|item| item.completed).count()
    }

    /// Completed vs. total, counted from the current items.
    #[must_use]
    pub fn progress(&self) -> ListProgress {
        ListProgress {
            completed: self.completed_count(),
            total: self.len(),
        }
    }

    /// The full state snapshot.
    #[must_use]
    pub const fn state(&self) -> &ShoppingListState {
        self.store.state()
    }

    /// Current hydration state.
    #[must_use]
    pub const fn hydration(&self) -> Hydration {
        self.store.hydration()
    }

    /// Returns `true` once the list has been hydrated.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.store.is_hydrated()
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl StateListener<ShoppingListState> + 'static) {
        self.store.subscribe(listener);
    }

    /// Restore the list from storage. Runs at most once.
    pub fn hydrate(&mut self, persister: &Persister<ShoppingListState>) -> bool {
        self.store.hydrate(persister)
    }
}
