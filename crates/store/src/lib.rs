//! Cart Calc store library.
//!
//! State containers for the shopping cart and the shopping list, and the
//! persistence layer that saves them after every mutation and restores them
//! once at startup.
//!
//! # Architecture
//!
//! - [`store::Store`] - generic owned state plus listeners and hydration state
//! - [`cart::CartStore`] / [`shopping_list::ShoppingListStore`] - domain operations
//! - [`persist::Persister`] - JSON snapshot load/save, subscribed as a listener
//! - [`storage`] - key-value storage backends (memory, files)
//! - [`provider::StoreProvider`] - builds both stores and hydrates them once
//! - [`state::AppState`] - configuration plus the provider, built at startup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod persist;
pub mod provider;
pub mod shopping_list;
pub mod state;
pub mod storage;
pub mod store;

pub use cart::{CartItem, CartItemUpdate, CartState, CartStore};
pub use config::{AppConfig, ConfigError, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use persist::Persister;
pub use provider::StoreProvider;
pub use shopping_list::{ListProgress, ShoppingListItem, ShoppingListItemUpdate, ShoppingListState, ShoppingListStore};
pub use state::AppState;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{Hydration, PersistedState, SnapshotError, StateListener, Store};
