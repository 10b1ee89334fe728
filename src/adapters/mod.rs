//! Adapter implementations for port traits
//!
//! - `sled_backend` - On-disk embedded database (production)
//! - `memory` - In-process ordered map (tests, embedding)

pub mod memory;
pub mod sled_backend;

pub use memory::MemoryBackend;
pub use sled_backend::SledBackend;
