//! Key/value storage seam for persisted client state.
//!
//! The cart store does not know where its bytes live. Callers inject a
//! [`Storage`] implementation: the storefront scopes a server-side vault per
//! visitor, tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value could not be serialized for writing.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A flat key/value store holding serialized entries.
///
/// Writes are full overwrites of the value under a key - last writer wins,
/// no merging, no versioned writes. Methods take `&self`; implementations
/// use interior mutability so a single handle can serve a request.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the medium cannot be written.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`Storage`] implementation.
///
/// The reference backend for unit tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("storage lock poisoned").len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

// Shared references delegate, so a storage handle can be split between a
// store and a test assertion.
impl<S: Storage> Storage for &S {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
