//! Shared test fixtures and mock backends

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde_json::{Value, json};
use signet::core::error::StorageError;
use signet::core::models::record_key;
use signet::core::ports::KeyValueBackend;
use signet::{Attestation, MemoryBackend};

/// Build an attestation from a JSON literal, panicking on bad shape
pub fn attestation(value: Value) -> Attestation {
    Attestation::from_value(0, value).expect("fixture must be a valid attestation")
}

/// Attestation for `id` tagged with a sequence number in its payload
pub fn tagged(id: &str, seq: u64) -> Attestation {
    attestation(json!({"data": {"id": id, "ok": true, "seq": seq}}))
}

/// Sequence numbers of a list of tagged attestations
pub fn seqs(attestations: &[Attestation]) -> Vec<u64> {
    attestations
        .iter()
        .map(|a| a.data_field("seq").and_then(Value::as_u64).expect("tagged attestation"))
        .collect()
}

/// Backend that fails reads or writes on demand
#[derive(Debug, Default)]
pub struct FailingBackend {
    inner: MemoryBackend,
    fail_reads: bool,
    fail_writes_for: Option<Vec<u8>>,
}

impl FailingBackend {
    /// Every `get` fails
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// Writes to `id`'s record fail, everything else works
    pub fn failing_writes_for(id: &str) -> Self {
        Self {
            fail_writes_for: Some(record_key(id)),
            ..Self::default()
        }
    }

    fn check_write(&self, key: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes_for.as_deref() == Some(key) {
            return Err(StorageError::backend("injected write failure"));
        }
        Ok(())
    }
}

impl KeyValueBackend for FailingBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::backend("injected read failure"));
        }
        self.inner.get(key)
    }

    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError> {
        self.check_write(key)?;
        self.inner.compare_and_swap(key, current, new)
    }
}

/// Backend that sneaks in a competing write right before the first swap
///
/// Reproduces the interleaving where two appends read the same old value.
#[derive(Debug)]
pub struct InterferingBackend {
    inner: MemoryBackend,
    competing_value: Vec<u8>,
    interfered: AtomicBool,
}

impl InterferingBackend {
    /// `competing_value` is written under the swapped key exactly once
    pub fn new(competing_value: Vec<u8>) -> Self {
        Self {
            inner: MemoryBackend::new(),
            competing_value,
            interfered: AtomicBool::new(false),
        }
    }

    /// Whether the competing write has happened
    pub fn interfered(&self) -> bool {
        self.interfered.load(Ordering::SeqCst)
    }
}

impl KeyValueBackend for InterferingBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError> {
        if !self.interfered.swap(true, Ordering::SeqCst) {
            let seen = self.inner.get(key)?;
            self.inner.compare_and_swap(key, seen.as_deref(), self.competing_value.clone())?;
        }
        self.inner.compare_and_swap(key, current, new)
    }
}

/// Backend that counts how often it is flushed
#[derive(Debug, Default)]
pub struct FlushCountingBackend {
    inner: MemoryBackend,
    flushes: AtomicUsize,
}

impl FlushCountingBackend {
    /// Number of completed flushes
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl KeyValueBackend for FlushCountingBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn compare_and_swap(
        &self,
        key: &[u8],
        current: Option<&[u8]>,
        new: Vec<u8>,
    ) -> Result<bool, StorageError> {
        self.inner.compare_and_swap(key, current, new)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
