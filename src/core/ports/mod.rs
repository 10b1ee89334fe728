//! Port traits (interfaces) for external dependencies
//!
//! The attestation store depends only on these traits, never on a concrete
//! database. Implementations live in the `adapters` module.

mod kv_backend;

pub use kv_backend::KeyValueBackend;
