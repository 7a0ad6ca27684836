//! Generic owned state container.
//!
//! A [`Store`] owns one state value, notifies its listeners synchronously
//! after every mutation, and tracks whether it has been hydrated from
//! storage. Cart and shopping list stores are thin domain wrappers around it.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::persist::Persister;

/// Hydration lifecycle of a store.
///
/// `Unhydrated -> Hydrated` happens exactly once per session; there is no
/// transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hydration {
    /// Initial state: holds an empty placeholder collection.
    #[default]
    Unhydrated,
    /// Holds restored data, or the empty default if nothing was stored.
    Hydrated,
}

/// A state type that is persisted as one JSON snapshot under a fixed key.
pub trait PersistedState: Serialize + DeserializeOwned + Default {
    /// Storage key of the snapshot.
    const STORAGE_KEY: &'static str;

    /// Number of items in the snapshot, for logging.
    fn len(&self) -> usize;

    /// Returns `true` if the snapshot holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Observer notified after every change to a store's state.
///
/// Listeners cannot fail the mutation that triggered them.
pub trait StateListener<S> {
    /// Called with the new state after a change.
    fn on_change(&self, state: &S);
}

impl<S, F> StateListener<S> for F
where
    F: Fn(&S),
{
    fn on_change(&self, state: &S) {
        self(state);
    }
}

/// Snapshot rejected while restoring it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Two items share an id.
    #[error("duplicate item id in snapshot: {0}")]
    DuplicateId(String),
}

/// Owned state plus listeners and hydration state.
///
/// Listeners are notified only once the store is hydrated. Mutations applied
/// while unhydrated stay in memory and are replaced by the restored snapshot.
pub struct Store<S> {
    state: S,
    hydration: Hydration,
    listeners: Vec<Box<dyn StateListener<S>>>,
}

impl<S: Default> Store<S> {
    /// Create an unhydrated store holding the default (empty) state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: S::default(),
            hydration: Hydration::Unhydrated,
            listeners: Vec::new(),
        }
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Store<S> {
    /// Read access to the current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Current hydration state.
    #[must_use]
    pub const fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Returns `true` once the store has been hydrated.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydration == Hydration::Hydrated
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl StateListener<S> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a mutation, then notify listeners.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut S) -> R) -> R {
        let result = mutate(&mut self.state);
        self.notify();
        result
    }

    /// Apply a mutation that reports whether it changed anything; listeners
    /// are notified only when it did.
    pub fn update_if(&mut self, mutate: impl FnOnce(&mut S) -> bool) -> bool {
        let changed = mutate(&mut self.state);
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        // Unhydrated stores neither notify nor persist.
        if !self.is_hydrated() {
            return;
        }
        for listener in &self.listeners {
            listener.on_change(&self.state);
        }
    }
}

impl<S: PersistedState> Store<S> {
    /// Restore state from storage. Runs at most once per store.
    ///
    /// Replaces the in-memory state with the stored snapshot, or with the
    /// empty default when nothing (or nothing valid) is stored, and notifies
    /// listeners. Returns `false` without reading storage if the store is
    /// already hydrated.
    pub fn hydrate(&mut self, persister: &Persister<S>) -> bool {
        if self.is_hydrated() {
            tracing::debug!(key = S::STORAGE_KEY, "store already hydrated, skipping");
            return false;
        }

        self.state = persister.load().unwrap_or_default();
        self.hydration = Hydration::Hydrated;
        tracing::info!(
            key = S::STORAGE_KEY,
            items = self.state.len(),
            "store hydrated"
        );
        self.notify();
        true
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("hydration", &self.hydration)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
