use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::storage::KeyValueStorage;

/// In-memory, `HashMap`-based storage.
///
/// Nothing survives the process. Used by tests and by the `memory` backend.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if a writer panicked while holding the lock.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .len())
    }

    /// Returns `true` if no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if a writer panicked while holding the lock.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let map = self.entries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut map = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut map = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("MemoryStorage")
            .field("key_count", &count)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("cart-storage").unwrap(), None);
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_set_then_get() {
        let storage = MemoryStorage::new();
        storage.set("cart-storage", r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.get("cart-storage").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_set_replaces() {
        let storage = MemoryStorage::new();
        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert!(storage.remove("k").unwrap());
        assert!(!storage.remove("k").unwrap());
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_debug_shows_count() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").unwrap();
        assert_eq!(format!("{storage:?}"), "MemoryStorage { key_count: 1 }");
    }
}
