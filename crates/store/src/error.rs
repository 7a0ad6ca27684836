//! Storage error types.

use thiserror::Error;

/// Errors from key-value storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used with this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// An in-memory backend lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
