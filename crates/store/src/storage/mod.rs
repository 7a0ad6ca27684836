//! Key-value storage for persisted snapshots.
//!
//! Storage is treated as an opaque get/set-by-key service holding one JSON
//! document per key. It may be empty (first run); an absent key is not an
//! error.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - `HashMap` behind a `RwLock`, for tests and ephemeral sessions
//! - [`FileStorage`] - one `<key>.json` file per key in a data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageResult;

/// Persistent key-value storage.
///
/// Implementations must satisfy:
/// - `get` of a key that was never set returns `Ok(None)`.
/// - `set` replaces the whole value stored under the key.
/// - Values are opaque; the storage never interprets them.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value under `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StorageResult<bool>;
}
