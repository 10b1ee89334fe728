//! signet - records and serves attestations keyed by subject identifier
//!
//! Attestations are claims about an identifier. They are grouped by
//! identifier, appended to that identifier's history, and persisted in an
//! embedded key-value store behind a small JSON-over-HTTP API.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod server;

pub use adapters::{MemoryBackend, SledBackend};
pub use config::ServerConfig;
pub use crate::core::error::{StorageError, ValidationError};
pub use crate::core::models::Attestation;
pub use crate::core::services::AttestationStore;
pub use server::HttpServer;
