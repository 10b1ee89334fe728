//! Business logic services
//!
//! - [`grouping`] - Stable partitioning of a batch by identifier
//! - [`attestation_store`] - Read and append attestation histories

pub mod attestation_store;
pub mod grouping;

pub use attestation_store::AttestationStore;
pub use grouping::group_by_id;
