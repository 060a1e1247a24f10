//! # API Error Type
//!
//! Unified error type for settlement requests.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in billsplit                              │
//! │                                                                         │
//! │  Caller                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /bills/42/settle                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  SettlementService::settle_json                                  │  │
//! │  │  Result<Settlement, ApiError>                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad JSON? ──────── serde_json::Error ──────────┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  Too large? ─────── limits ─────────────────► ApiError ────────►│  │
//! │  │         │                                       ▲               │  │
//! │  │         ▼                                       │               │  │
//! │  │  Bad bill? ──────── SettlementError ────────────┘               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR",                                          │
//! │    "message": "item at index 2 has zero quantity" }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use billsplit_core::SettlementError;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from every service entry point.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "total price and total payments must be equal (...)"
/// }
/// ```
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
    /// The bill failed validation (400)
    ValidationError,

    /// The bill exceeds a configured limit (413)
    LimitExceeded,

    /// The request body isn't a bill (400)
    MalformedRequest,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 400,
            ErrorCode::LimitExceeded => 413,
            ErrorCode::MalformedRequest => 400,
            ErrorCode::Internal => 500,
        }
    }
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

    /// Creates a limit error.
    pub fn limit_exceeded(what: &str, actual: usize, max: usize) -> Self {
        ApiError::new(
            ErrorCode::LimitExceeded,
            format!("{} {} exceeds maximum allowed ({})", what, actual, max),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Shorthand for `self.code.status_code()`.
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

/// Converts settlement errors to API errors.
///
/// Validation errors are the caller's to fix and keep their full message.
/// Internal errors are engine defects: logged in full, reported generically.
impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Internal(e) => {
                tracing::error!(error = %e, "Settlement invariant violated");
                ApiError::internal("Settlement failed due to an internal error")
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

/// Converts JSON errors to API errors.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::new(
            ErrorCode::MalformedRequest,
            format!("Malformed bill: {}", err),
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures while loading [`SettlementConfig`](crate::config::SettlementConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file couldn't be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file isn't valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of bounds.
    #[error("Invalid settlement configuration: {0}")]
    InvalidValue(String),
}

// =============================================================================
// Tests
// =============================================================================
