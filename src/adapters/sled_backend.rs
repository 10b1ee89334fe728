//! Sled adapter for the key-value port

use std::path::Path;

use crate::core::error::StorageError;
use crate::core::ports::KeyValueBackend;

/// Key-value backend stored in a sled database directory
#[derive(Debug, Clone)]
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(StorageError::backend)?;
        Ok(Self { db })
    }
}

impl KeyValueBackend for SledBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self.db.get(key).map_err(StorageError::backend)?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError> {
        let swapped = self
            .db
            .compare_and_swap(key, current, Some(new))
            .map_err(StorageError::backend)?;
        Ok(swapped.is_ok())
    }

    fn flush(&self) -> Result<(), StorageError> {
        let bytes = self.db.flush().map_err(StorageError::backend)?;
        log::debug!("Flushed {bytes} bytes to disk");
        Ok(())
    }
}
