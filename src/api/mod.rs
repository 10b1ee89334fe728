//! HTTP-agnostic API layer
//!
//! This module provides response structures and pure handlers that any HTTP
//! server implementation (or an embedding program) can call directly.
//!
//! ## Design
//!
//! - **Handlers are pure functions**: Take typed input, return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: No HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod types;

pub use error::{ApiError, ErrorCode};
pub use handlers::{get_attestations, save_attestations};
pub use types::{ApiResponse, AttestationsData};
