//! Shopping cart store.
//!
//! Holds line items in insertion order and a total that is recomputed from
//! the items after every mutation. Persisted under `cart-storage` as
//! `{ "items": [{id, name, quantity, price}], "total": number }`.

use std::collections::HashSet;

use cart_calc_core::{CartItemId, ItemName, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::persist::Persister;
use crate::store::{Hydration, PersistedState, SnapshotError, StateListener, Store};

/// A single cart line: one product at a quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub name: ItemName,
    pub quantity: Quantity,
    pub price: Price,
}

impl CartItem {
    /// Price of this line (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Field updates for [`CartStore::edit_item`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartItemUpdate {
    pub name: Option<ItemName>,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
}

impl CartItemUpdate {
    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }

    fn apply(self, item: &mut CartItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
    }
}

/// Cart contents and their derived total.
///
/// The total is never read from storage: restoring a snapshot recomputes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartSnapshot")]
pub struct CartState {
    items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

/// Wire form accepted on restore. A stored `total` is ignored.
#[derive(Deserialize)]
struct CartSnapshot {
    items: Vec<CartItem>,
}

impl TryFrom<CartSnapshot> for CartState {
    type Error = SnapshotError;

    fn try_from(snapshot: CartSnapshot) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(snapshot.items.len());
        for item in &snapshot.items {
            if !seen.insert(&item.id) {
                return Err(SnapshotError::DuplicateId(item.id.to_string()));
            }
        }

        let mut state = Self {
            items: snapshot.items,
            total: Decimal::ZERO,
        };
        state.recompute_total();
        Ok(state)
    }
}

impl CartState {
    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of `price × quantity` over all items.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    fn contains(&self, id: &CartItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(CartItem::line_total).sum();
    }
}

impl PersistedState for CartState {
    const STORAGE_KEY: &'static str = "cart-storage";

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// The shopping cart.
#[derive(Debug, Default)]
pub struct CartStore {
    store: Store<CartState>,
}

impl CartStore {
    /// Create an empty, unhydrated cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new line item and return its generated id.
    pub fn add_item(&mut self, name: ItemName, quantity: Quantity, price: Price) -> CartItemId {
        self.store.update(|state| {
            let mut id = CartItemId::generate();
            while state.contains(&id) {
                id = CartItemId::generate();
            }

            tracing::debug!(item_id = %id, name = %name, "cart item added");
            state.items.push(CartItem {
                id: id.clone(),
                name,
                quantity,
                price,
            });
            state.recompute_total();
            id
        })
    }

    /// Remove the item with `id`. Returns `false` (a no-op) if it is absent.
    pub fn remove_item(&mut self, id: &CartItemId) -> bool {
        self.store.update_if(|state| {
            let before = state.items.len();
            state.items.retain(|item| &item.id != id);
            if state.items.len() == before {
                tracing::debug!(item_id = %id, "cart item not found, nothing removed");
                return false;
            }
            tracing::debug!(item_id = %id, "cart item removed");
            state.recompute_total();
            true
        })
    }

    /// Apply `update` to the item with `id`, keeping its id. Returns `false`
    /// (a no-op) if it is absent.
    pub fn edit_item(&mut self, id: &CartItemId, update: CartItemUpdate) -> bool {
        self.store.update_if(|state| {
            let Some(item) = state.items.iter_mut().find(|item| &item.id == id) else {
                tracing::debug!(item_id = %id, "cart item not found, nothing edited");
                return false;
            };
            update.apply(item);
            tracing::debug!(item_id = %id, "cart item edited");
            state.recompute_total();
            true
        })
    }

    /// Remove every item and reset the total to zero.
    pub fn clear_cart(&mut self) {
        self.store.update(|state| {
            state.items.clear();
            state.total = Decimal::ZERO;
        });
        tracing::debug!("cart cleared");
    }

    /// Current total.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.store.state().total()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.store.state().items()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items().iter().find(|item| &item.id == id)
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> Decimal {
        self.items().iter().map(|item| item.quantity.as_decimal()).sum()
    }

    /// The full state snapshot.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        self.store.state()
    }

    /// Current hydration state.
    #[must_use]
    pub const fn hydration(&self) -> Hydration {
        self.store.hydration()
    }

    /// Returns `true` once the cart has been hydrated.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.store.is_hydrated()
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl StateListener<CartState> + 'static) {
        self.store.subscribe(listener);
    }

    /// Restore the cart from storage. Runs at most once.
    pub fn hydrate(&mut self, persister: &Persister<CartState>) -> bool {
        self.store.hydrate(persister)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};

    fn name(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    fn qty(n: u32) -> Quantity {
        Quantity::from_u32(n).unwrap()
    }

    fn price(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_milk_and_bread_scenario() {
        let mut cart = CartStore::new();
        let milk = cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.add_item(name("Bread"), qty(1), price("5.00"));
        assert_eq!(cart.total(), dec("12.00"));

        assert!(cart.remove_item(&milk));
        assert_eq!(cart.total(), dec("5.00"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].name.as_str(), "Bread");
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = CartStore::new();
        cart.add_item(name("A"), qty(1), price("1"));
        cart.add_item(name("B"), qty(1), price("1"));
        cart.add_item(name("C"), qty(1), price("1"));

        let names: Vec<&str> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut cart = CartStore::new();
        let id = cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.add_item(name("Bread"), qty(1), price("5.00"));

        assert!(cart.remove_item(&id));
        assert!(!cart.remove_item(&id));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), dec("5"));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(name("Milk"), qty(1), price("3.50"));
        assert!(!cart.remove_item(&CartItemId::parse("missing").unwrap()));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_edit_recomputes_total_and_keeps_id() {
        let mut cart = CartStore::new();
        let id = cart.add_item(name("Milk"), qty(2), price("3.50"));

        let edited = cart.edit_item(
            &id,
            CartItemUpdate {
                quantity: Some(qty(4)),
                price: Some(price("2.25")),
                ..Default::default()
            },
        );

        assert!(edited);
        let item = cart.get(&id).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.name.as_str(), "Milk");
        assert_eq!(cart.total(), dec("9.00"));
    }

    #[test]
    fn test_edit_name_only() {
        let mut cart = CartStore::new();
        let id = cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.edit_item(
            &id,
            CartItemUpdate {
                name: Some(name("Oat milk")),
                ..Default::default()
            },
        );

        let item = cart.get(&id).unwrap();
        assert_eq!(item.name.as_str(), "Oat milk");
        assert_eq!(item.quantity, qty(2));
        assert_eq!(cart.total(), dec("7.00"));
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(name("Milk"), qty(2), price("3.50"));
        let before = cart.state().clone();

        let edited = cart.edit_item(
            &CartItemId::parse("nope").unwrap(),
            CartItemUpdate {
                price: Some(price("100")),
                ..Default::default()
            },
        );

        assert!(!edited);
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = CartStore::new();
        cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.add_item(name("Bread"), qty(1), price("5.00"));

        cart.clear_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.clear_cart();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = CartStore::new();
        cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.add_item(name("Apples"), Quantity::parse("1.5").unwrap(), price("8"));
        assert_eq!(cart.item_count(), dec("3.5"));
        assert_eq!(cart.total(), dec("19"));
    }

    #[test]
    fn test_ids_unique_over_large_batch() {
        let mut cart = CartStore::new();
        for i in 0..5_000 {
            cart.add_item(name(&format!("item {i}")), qty(1), price("1"));
        }
        let ids: HashSet<&CartItemId> = cart.items().iter().map(|item| &item.id).collect();
        assert_eq!(ids.len(), 5_000);
    }

    #[test]
    fn test_mutations_notify_listeners_only_on_change() {
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let mut cart = CartStore::new();
        let sink = Rc::clone(&snapshots);
        cart.subscribe(move |state: &CartState| sink.borrow_mut().push(state.total()));
        cart.hydrate(&Persister::new(Arc::new(MemoryStorage::new())));

        let id = cart.add_item(name("Milk"), qty(2), price("3.50"));
        cart.remove_item(&CartItemId::parse("missing").unwrap());
        cart.edit_item(
            &id,
            CartItemUpdate {
                quantity: Some(qty(1)),
                ..Default::default()
            },
        );
        cart.clear_cart();

        assert_eq!(
            *snapshots.borrow(),
            vec![Decimal::ZERO, dec("7"), dec("3.5"), Decimal::ZERO]
        );
    }

    #[test]
    fn test_serialized_layout() {
        let mut cart = CartStore::new();
        let id = cart.add_item(name("Milk"), qty(2), price("3.50"));

        let json: serde_json::Value = serde_json::to_value(cart.state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{"id": id.as_str(), "name": "Milk", "quantity": 2.0, "price": 3.5}],
                "total": 7.0
            })
        );
    }

    #[test]
    fn test_restore_recomputes_stale_total() {
        let raw = r#"{"items":[{"id":"lx1","name":"Milk","quantity":2,"price":3.5}],"total":999}"#;
        let state: CartState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.total(), dec("7"));
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let raw = r#"{"items":[
            {"id":"a","name":"Milk","quantity":1,"price":1},
            {"id":"a","name":"Bread","quantity":1,"price":1}
        ],"total":2}"#;
        assert!(serde_json::from_str::<CartState>(raw).is_err());
    }

    #[test]
    fn test_restore_rejects_invalid_values() {
        let zero_price = r#"{"items":[{"id":"a","name":"Milk","quantity":1,"price":0}],"total":0}"#;
        let empty_name = r#"{"items":[{"id":"a","name":"","quantity":1,"price":1}],"total":1}"#;
        assert!(serde_json::from_str::<CartState>(zero_price).is_err());
        assert!(serde_json::from_str::<CartState>(empty_name).is_err());
    }

    #[test]
    fn test_hydrate_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                "cart-storage",
                r#"{"items":[{"id":"lx1","name":"Milk","quantity":2,"price":3.5},{"id":"lx2","name":"Bread","quantity":1,"price":5}],"total":12}"#,
            )
            .unwrap();

        let mut cart = CartStore::new();
        assert!(cart.hydrate(&Persister::new(storage)));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), dec("12"));
        assert_eq!(cart.hydration(), Hydration::Hydrated);
    }

    #[test]
    fn test_hydrate_without_snapshot_is_empty() {
        let mut cart = CartStore::new();
        assert!(cart.hydrate(&Persister::new(Arc::new(MemoryStorage::new()))));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { cents: i64, quantity: u32 },
        Remove(usize),
        Edit { index: usize, quantity: u32 },
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (1i64..100_000, 1u32..50).prop_map(|(cents, quantity)| Op::Add { cents, quantity }),
            2 => (0usize..20).prop_map(Op::Remove),
            2 => (0usize..20, 1u32..50).prop_map(|(index, quantity)| Op::Edit { index, quantity }),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_matches_items(ops in proptest::collection::vec(op_strategy(), 0..60)) {
            let mut cart = CartStore::new();
            for op in ops {
                match op {
                    Op::Add { cents, quantity } => {
                        cart.add_item(name("x"), qty(quantity), Price::from_cents(cents).unwrap());
                    }
                    Op::Remove(index) => {
                        if let Some(id) = cart.items().get(index).map(|item| item.id.clone()) {
                            cart.remove_item(&id);
                        }
                    }
                    Op::Edit { index, quantity } => {
                        if let Some(id) = cart.items().get(index).map(|item| item.id.clone()) {
                            cart.edit_item(&id, CartItemUpdate { quantity: Some(qty(quantity)), ..Default::default() });
                        }
                    }
                    Op::Clear => cart.clear_cart(),
                }

                let expected: Decimal = cart
                    .items()
                    .iter()
                    .map(|item| item.price.amount() * item.quantity.as_decimal())
                    .sum();
                prop_assert_eq!(cart.total(), expected);
            }
        }
    }
}
