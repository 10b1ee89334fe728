//! Error types for the attestation core
//!
//! Storage errors are opaque to HTTP clients and logged in full server-side.
//! Validation errors never reach the store.

use thiserror::Error;

/// Boxed error produced by a backend implementation
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while reading or writing attestation records
///
/// A missing key is not an error: backends report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key-value backend failed
    #[error("storage backend failure: {0}")]
    Backend(#[source] BackendError),

    /// A stored record could not be decoded
    #[error("corrupt record under key {key}: {source}")]
    Corrupt {
        /// Backend key holding the bad value
        key: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// A merged record could not be encoded
    #[error("failed to encode record for {id}: {source}")]
    Encode {
        /// Identifier whose record was being written
        id: String,
        /// Encoder error
        #[source]
        source: serde_json::Error,
    },

    /// A per-identifier append worker panicked
    #[error("append worker for {id} panicked")]
    WorkerPanicked {
        /// Identifier the worker was appending to
        id: String,
    },
}

impl StorageError {
    /// Wrap any backend error
    pub fn backend(err: impl Into<BackendError>) -> Self {
        Self::Backend(err.into())
    }
}

/// Shape-check failure for an incoming attestation batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request body is not a JSON object
    #[error("request body is not an object")]
    BodyNotObject,

    /// `attestations` is absent
    #[error("missing `attestations` field")]
    MissingAttestations,

    /// `attestations` is present but not an array
    #[error("`attestations` is not an array")]
    AttestationsNotArray,

    /// An element has no `data` object
    #[error("attestation {index} has no `data` object")]
    MissingData {
        /// Position in the batch
        index: usize,
    },

    /// An element has no usable `data.id`
    #[error("attestation {index} has no non-empty string `data.id`")]
    MissingId {
        /// Position in the batch
        index: usize,
    },

    /// An element has no `data.ok` key
    #[error("attestation {index} has no `data.ok` key")]
    MissingOk {
        /// Position in the batch
        index: usize,
    },
}
