//! Error types for ride request deeplinks.
//!
//! This module provides the shared error type used by the core and deeplink crates,
//! including stable error codes and structured error responses for host applications.

use serde::Serialize;
use thiserror::Error;

/// Main error type for deeplink operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No client id was configured
    #[error("Missing client id: a client id is required to build deeplinks")]
    MissingClientId,

    /// A parameter value could not be percent-encoded or decoded
    #[error("Unrepresentable value: {0}")]
    UnrepresentableValue(String),

    /// Unknown query parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for deeplink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingClientId => "MISSING_CLIENT_ID",
            Self::UnrepresentableValue(_) => "UNREPRESENTABLE_VALUE",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        }
    }

    /// Returns true if the host application should log this error.
    ///
    /// These are the recoverable setup failures: the caller skips attaching
    /// deeplink behavior and carries on.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(self, Self::MissingClientId | Self::ConfigError(_))
    }
}

// Conversions from external error types
impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::UnrepresentableValue(err.to_string())
    }
}
