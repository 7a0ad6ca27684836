//! Integration tests for Cart Calc.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-calc-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - state surviving restarts over file storage
//! - `scenarios` - end-to-end cart and shopping list flows
//!
//! Each test gets its own [`TestEnv`]: a temporary data directory that
//! simulated sessions open and close, like separate runs of the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cart_calc_store::{AppConfig, AppState, FileStorage, StorageBackend, StorageResult, StoreProvider};
use tempfile::TempDir;

/// A temporary data directory shared by a sequence of sessions.
#[derive(Debug)]
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the snapshot file for `key`.
    #[must_use]
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }

    /// Configuration pointing the file backend at this directory.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        AppConfig {
            storage: StorageBackend::File,
            data_dir: self.dir.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    /// Start a session: open file storage and mount the stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be opened.
    pub fn session(&self) -> StorageResult<AppState> {
        AppState::new(self.config())
    }

    /// Build a provider over this directory without mounting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be opened.
    pub fn unmounted_provider(&self) -> StorageResult<StoreProvider> {
        let storage = FileStorage::open(self.dir.path())?;
        Ok(StoreProvider::new(Arc::new(storage)))
    }

    /// Write a raw snapshot file, bypassing the stores.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write_snapshot(&self, key: &str, contents: &str) -> std::io::Result<()> {
        std::fs::write(self.snapshot_path(key), contents)
    }

    /// Read a raw snapshot file, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for anything other than a missing file.
    pub fn read_snapshot(&self, key: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.snapshot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
