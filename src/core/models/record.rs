//! Persisted attestation history for one identifier

use serde::{Deserialize, Serialize};

use super::Attestation;
use crate::core::error::StorageError;

/// Prefix of every record key in the backend
pub const KEY_PREFIX: &str = "/sig/";

/// Backend key for an identifier's record
#[must_use]
pub fn record_key(id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(KEY_PREFIX.len() + id.len());
    key.extend_from_slice(KEY_PREFIX.as_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

/// Append-only attestation history stored under one key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Attestations in insertion order
    pub attestations: Vec<Attestation>,
}

impl AttestationRecord {
    /// Decode a stored value; `None` is an empty history
    pub fn decode(key: &[u8], raw: Option<&[u8]>) -> Result<Self, StorageError> {
        raw.map_or_else(
            || Ok(Self::default()),
            |bytes| {
                serde_json::from_slice(bytes).map_err(|source| StorageError::Corrupt {
                    key: String::from_utf8_lossy(key).into_owned(),
                    source,
                })
            },
        )
    }

    /// Encode for storage
    pub fn encode(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec(self).map_err(|source| StorageError::Encode {
            id: id.to_string(),
            source,
        })
    }

    /// Append new attestations after the existing ones
    pub fn append(&mut self, new: &[Attestation]) {
        self.attestations.extend_from_slice(new);
    }
}
