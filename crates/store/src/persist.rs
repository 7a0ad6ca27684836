//! Snapshot persistence.
//!
//! A [`Persister`] serializes a store's full state to JSON under the state's
//! fixed storage key, and restores it at startup. Saving is fire-and-forget:
//! failures are logged and never reach the caller of the mutation. Loading
//! treats a missing, unreadable or malformed snapshot as "nothing stored".

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::instrument;

use crate::storage::KeyValueStorage;
use crate::store::{PersistedState, StateListener};

/// Loads and saves snapshots of `S` under `S::STORAGE_KEY`.
pub struct Persister<S> {
    storage: Arc<dyn KeyValueStorage>,
    _state: PhantomData<fn() -> S>,
}

impl<S> Clone for Persister<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _state: PhantomData,
        }
    }
}

impl<S: PersistedState> Persister<S> {
    /// Create a persister over a shared storage handle.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            _state: PhantomData,
        }
    }

    /// The storage key this persister reads and writes.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        S::STORAGE_KEY
    }

    /// Read the last saved snapshot.
    ///
    /// Returns `None` when the key is absent, when storage cannot be read, or
    /// when the stored value is malformed. The last two are logged.
    #[instrument(skip(self), fields(key = S::STORAGE_KEY))]
    pub fn load(&self) -> Option<S> {
        let raw = match self.storage.get(S::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no snapshot stored");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read snapshot, starting empty");
                return None;
            }
        };

        match serde_json::from_str::<S>(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "malformed snapshot, starting empty");
                None
            }
        }
    }

    /// Write a snapshot. Errors are logged, not returned.
    pub fn save(&self, state: &S) {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = S::STORAGE_KEY, error = %e, "failed to serialize snapshot");
                return;
            }
        };

        match self.storage.set(S::STORAGE_KEY, &json) {
            Ok(()) => tracing::trace!(key = S::STORAGE_KEY, items = state.len(), "snapshot saved"),
            Err(e) => {
                tracing::warn!(key = S::STORAGE_KEY, error = %e, "failed to save snapshot");
            }
        }
    }
}

impl<S: PersistedState> StateListener<S> for Persister<S> {
    fn on_change(&self, state: &S) {
        self.save(state);
    }
}

impl<S> std::fmt::Debug for Persister<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister").finish_non_exhaustive()
    }
}
