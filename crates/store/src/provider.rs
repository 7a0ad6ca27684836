//! Persistence bridge.
//!
//! The [`StoreProvider`] owns the single instance of each store for the
//! session. On construction it subscribes a [`Persister`] to each store so
//! that every change is written to storage; [`StoreProvider::mount`] then
//! restores each store from storage at most once.

use std::sync::Arc;

use tracing::instrument;

use crate::cart::{CartState, CartStore};
use crate::persist::Persister;
use crate::shopping_list::{ShoppingListState, ShoppingListStore};
use crate::storage::KeyValueStorage;

/// Owner of the cart and shopping list stores.
#[derive(Debug)]
pub struct StoreProvider {
    cart: CartStore,
    shopping_list: ShoppingListStore,
    cart_persister: Persister<CartState>,
    shopping_list_persister: Persister<ShoppingListState>,
}

impl StoreProvider {
    /// Build both stores over a shared storage handle.
    ///
    /// Stores start unhydrated; call [`Self::mount`] before presenting data.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let cart_persister: Persister<CartState> = Persister::new(Arc::clone(&storage));
        let shopping_list_persister: Persister<ShoppingListState> = Persister::new(storage);

        let mut cart = CartStore::new();
        cart.subscribe(cart_persister.clone());

        let mut shopping_list = ShoppingListStore::new();
        shopping_list.subscribe(shopping_list_persister.clone());

        Self {
            cart,
            shopping_list,
            cart_persister,
            shopping_list_persister,
        }
    }

    /// Hydrate each store that has not been hydrated yet.
    ///
    /// Safe to call on every render: a store is read from storage at most
    /// once per session. Returns the number of stores hydrated by this call.
    #[instrument(skip(self))]
    pub fn mount(&mut self) -> usize {
        let mut hydrated = 0;
        if !self.cart.is_hydrated() && self.cart.hydrate(&self.cart_persister) {
            hydrated += 1;
        }
        if !self.shopping_list.is_hydrated()
            && self.shopping_list.hydrate(&self.shopping_list_persister)
        {
            hydrated += 1;
        }
        hydrated
    }

    /// Returns `true` once both stores are hydrated.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.cart.is_hydrated() && self.shopping_list.is_hydrated()
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable access to the cart.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// The shopping list.
    #[must_use]
    pub const fn shopping_list(&self) -> &ShoppingListStore {
        &self.shopping_list
    }

    /// Mutable access to the shopping list.
    pub const fn shopping_list_mut(&mut self) -> &mut ShoppingListStore {
        &mut self.shopping_list
    }
}
