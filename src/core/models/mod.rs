//! Domain models
//!
//! - `Attestation` - a claim about a subject identifier
//! - `AttestationRecord` - the persisted history for one identifier

mod attestation;
mod record;

pub use attestation::Attestation;
pub use record::{AttestationRecord, KEY_PREFIX, record_key};
