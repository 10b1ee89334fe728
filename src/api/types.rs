//! API response types
//!
//! Every response body is an object with an `ok` flag. Successful lookups add
//! an `attestations` array, failures add a fixed `error` message.

use serde::Serialize;

use crate::core::models::Attestation;

use super::error::ApiError;

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub ok: bool,
    /// Response fields, flattened into the envelope
    #[serde(flatten)]
    pub data: Option<T>,
    /// Client-facing error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response carrying `data`
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response with no data
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    /// Create an error response
    #[must_use]
    pub const fn error(err: &ApiError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err.message()),
        }
    }
}

/// Lookup endpoint response data
#[derive(Debug, Serialize)]
pub struct AttestationsData {
    /// Stored attestations, oldest first
    pub attestations: Vec<Attestation>,
}
