//! Application state built once at startup.

use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::error::StorageResult;
use crate::provider::StoreProvider;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Configuration plus the mounted stores for the session.
#[derive(Debug)]
pub struct AppState {
    config: AppConfig,
    stores: StoreProvider,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Opens the configured storage backend and mounts the stores, so both
    /// are hydrated when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend's data directory cannot be created.
    pub fn new(config: AppConfig) -> StorageResult<Self> {
        let storage: Arc<dyn KeyValueStorage> = match config.storage {
            StorageBackend::File => Arc::new(FileStorage::open(config.data_dir.clone())?),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        tracing::debug!(backend = %config.storage, "storage opened");
        Ok(Self::with_storage(config, storage))
    }

    /// Create the application state over an existing storage handle.
    ///
    /// The `storage` setting of `config` is ignored.
    #[must_use]
    pub fn with_storage(config: AppConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut stores = StoreProvider::new(storage);
        let hydrated = stores.mount();
        tracing::debug!(hydrated, "application state ready");
        Self { config, stores }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the stores.
    #[must_use]
    pub const fn stores(&self) -> &StoreProvider {
        &self.stores
    }

    /// Get mutable access to the stores.
    pub const fn stores_mut(&mut self) -> &mut StoreProvider {
        &mut self.stores
    }
}
