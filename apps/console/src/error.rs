//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Product Editor                     │
//! │                                                                         │
//! │  Expected outcomes (NOT errors, returned as SubmitResponse):            │
//! │    Stage A field errors ──────────► inline, keyed by data-field         │
//! │    Backend 422 field map ─────────► inline, same shape                  │
//! │    Stage B blocking error ────────► toast                               │
//! │                                                                         │
//! │  Failures (ApiError):                                                   │
//! │    ServiceError::Unavailable ─────► SERVICE_UNAVAILABLE                 │
//! │    ServiceError::Server ──────────► INTERNAL (details logged only)      │
//! │    CoreError (payload building) ──► VALIDATION_ERROR / BUSINESS_LOGIC   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The frontend receives:
//! ```json
//! { "code": "SERVICE_UNAVAILABLE", "message": "Product service is unavailable" }
//! ```

use serde::Serialize;
use thiserror::Error;

use meem_core::{CoreError, FieldErrors};

/// API error returned from console commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Business rule rejected the request
    BusinessLogic,

    /// Product service could not be reached
    ServiceUnavailable,

    /// Internal or upstream server error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fields(errors) => ApiError::validation(errors.to_string()),
            CoreError::Blocked(e) => ApiError::new(ErrorCode::BusinessLogic, e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Service Error
// =============================================================================

/// Failures reported by the product service collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// HTTP 422 with a field map; rendered inline like Stage A errors.
    #[error("Rejected by product service: {0}")]
    Unprocessable(FieldErrors),

    /// Network failure, timeout, or 503.
    #[error("Product service is unavailable: {0}")]
    Unavailable(String),

    /// Any other non-success response.
    #[error("Product service returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// Converts service errors to API errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unprocessable(errors) => ApiError::validation(errors.to_string()),
            ServiceError::Unavailable(reason) => {
                tracing::warn!(%reason, "Product service unavailable");
                ApiError::new(ErrorCode::ServiceUnavailable, "Product service is unavailable")
            }
            ServiceError::Server { status, message } => {
                // Log the upstream detail but return a generic message
                tracing::error!(status, %message, "Product service error");
                ApiError::internal("Product could not be saved")
            }
        }
    }
}
