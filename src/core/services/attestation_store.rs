//! Attestation store - read and append per-identifier histories
//!
//! Each identifier's history lives under one backend key. Saving a batch
//! appends every group to its identifier's record with a compare-and-swap
//! loop, so concurrent saves to the same identifier never lose attestations.

use std::thread;

use crate::core::error::StorageError;
use crate::core::models::{Attestation, AttestationRecord, record_key};
use crate::core::ports::KeyValueBackend;

use super::grouping::group_by_id;

/// Attestation store over a key-value backend
#[derive(Debug)]
pub struct AttestationStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> AttestationStore<B> {
    /// Create a store that owns `backend`
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// All attestations stored for `id`, oldest first
    ///
    /// An identifier that was never written has an empty history.
    pub fn get_attestations(&self, id: &str) -> Result<Vec<Attestation>, StorageError> {
        let key = record_key(id);
        let raw = self.backend.get(&key)?;
        Ok(AttestationRecord::decode(&key, raw.as_deref())?.attestations)
    }

    /// Append a batch of already-validated attestations
    ///
    /// The batch is grouped by identifier and every group is appended on its
    /// own scoped thread. The call fails if any group fails; groups that were
    /// already written stay written. Written records are flushed to the
    /// backend before the call returns.
    pub fn save_attestations(&self, attestations: Vec<Attestation>) -> Result<(), StorageError> {
        let groups = group_by_id(attestations);
        if groups.is_empty() {
            return Ok(());
        }

        let appended = self.append_groups(&groups);
        let flushed = self.backend.flush();
        appended.and(flushed)
    }

    fn append_groups(&self, groups: &[(String, Vec<Attestation>)]) -> Result<(), StorageError> {
        if let [(id, batch)] = groups {
            return self.append(id, batch);
        }

        thread::scope(|scope| {
            let workers: Vec<_> = groups
                .iter()
                .map(|(id, batch)| (id, scope.spawn(move || self.append(id, batch))))
                .collect();

            let mut first_error = None;
            for (id, worker) in workers {
                let outcome = worker
                    .join()
                    .unwrap_or_else(|_| Err(StorageError::WorkerPanicked { id: id.clone() }));
                if let Err(err) = outcome {
                    if first_error.is_none() {
                        first_error = Some(err);
                    } else {
                        log::error!("Additional failure while saving attestations: {err}");
                    }
                }
            }

            first_error.map_or(Ok(()), Err)
        })
    }

    /// Read-append-write one identifier's record until the swap lands
    fn append(&self, id: &str, new: &[Attestation]) -> Result<(), StorageError> {
        let key = record_key(id);

        loop {
            let current = self.backend.get(&key)?;
            let mut record = AttestationRecord::decode(&key, current.as_deref())?;
            record.append(new);
            let encoded = record.encode(id)?;

            if self.backend.compare_and_swap(&key, current.as_deref(), encoded)? {
                log::info!("Saved {} attestations for {id}.", new.len());
                return Ok(());
            }
            log::debug!("Record for {id} changed during append, retrying");
        }
    }
}
