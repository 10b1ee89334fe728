//! API error types with HTTP status code mapping
//!
//! Clients only ever see the fixed message for an error code. The detail
//! string is for server-side logs.

use crate::core::error::{StorageError, ValidationError};

/// Error codes that map to HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed attestation batch (200, reported in the body)
    InvalidData,
    /// Unknown route (404)
    NotFound,
    /// Storage or request-handling failure (500)
    Internal,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// Invalid input is answered with 200 and `ok: false`.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidData => 200,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    /// Client-facing error message
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidData => "invalid data",
            Self::NotFound => "not found",
            Self::Internal => "internal error",
        }
    }
}

/// API error with code and server-side detail
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error code (determines HTTP status and client message)
    pub code: ErrorCode,
    /// What actually went wrong; never sent to the client
    pub detail: String,
}

impl ApiError {
    /// Create an invalid data error
    #[must_use]
    pub fn invalid_data(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidData,
            detail: detail.into(),
        }
    }

    /// Create a not found error
    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            detail: detail.into(),
        }
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    /// Message sent to the client
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.code.as_str()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.detail)
    }
}

impl std::error::Error for ApiError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_data(err.to_string())
    }
}
