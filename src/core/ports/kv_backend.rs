//! Key-value backend port
//!
//! Defines the interface the attestation store persists through.

use crate::core::error::StorageError;

/// Embedded key-value store with ordered binary keys
///
/// Implementations must be safe to share between threads: the store fans out
/// one worker per identifier and the server handles requests concurrently.
pub trait KeyValueBackend: Send + Sync {
    /// Load the value under `key`
    ///
    /// A missing key is `Ok(None)`, never an error.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Atomically replace the value under `key` if it still equals `current`
    ///
    /// This is the only write path: appends are read-modify-write loops.
    ///
    /// `current == None` means the key must be absent. Returns `false` without
    /// writing when another writer got there first.
    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError>;

    /// Make completed writes durable
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
