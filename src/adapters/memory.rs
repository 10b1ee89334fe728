//! In-memory adapter for the key-value port
//!
//! Nothing is persisted; used by tests and by embedders that want a scratch
//! store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::core::error::StorageError;
use crate::core::ports::KeyValueBackend;

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Ordered map guarded by a mutex
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Entries>,
}

impl MemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::backend("memory backend lock poisoned"))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError> {
        let mut entries = self.lock()?;
        if entries.get(key).map(Vec::as_slice) != current {
            return Ok(false);
        }
        entries.insert(key.to_vec(), new);
        Ok(true)
    }
}
