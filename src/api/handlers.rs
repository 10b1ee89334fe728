//! Pure API handlers
//!
//! These handlers contain business logic and are HTTP-agnostic.
//! They take typed input and return `Result<T, ApiError>`.

use serde_json::Value;

use crate::core::models::Attestation;
use crate::core::ports::KeyValueBackend;
use crate::core::services::AttestationStore;

use super::error::ApiError;
use super::types::AttestationsData;

/// Look up every attestation stored for `id`
pub fn get_attestations<B: KeyValueBackend>(
    store: &AttestationStore<B>,
    id: &str,
) -> Result<AttestationsData, ApiError> {
    let attestations = store.get_attestations(id)?;
    Ok(AttestationsData { attestations })
}

/// Validate a submitted `{"attestations": [...]}` body and store it
///
/// Nothing is written unless every element passes the shape check.
pub fn save_attestations<B: KeyValueBackend>(
    store: &AttestationStore<B>,
    body: Value,
) -> Result<(), ApiError> {
    let batch = Attestation::batch_from_value(body)?;
    store.save_attestations(batch)?;
    Ok(())
}
