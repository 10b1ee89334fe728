//! Core domain logic for signet
//!
//! This module contains the attestation aggregation logic. Persistence is
//! abstracted through the `KeyValueBackend` port.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Attestation, AttestationRecord)
//! - `services/` - The attestation store
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Storage and validation errors

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
