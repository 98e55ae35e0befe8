//! Error types and error code constants for tidyup.
//!
//! `TidyError` is the single error type rendered by the CLI. Subsystem errors
//! (rule option validation, parsing, file IO) are bridged into it with
//! `impl From<X> for TidyError` in the crates that define them.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or configuration
//! - `3`: File not found
//! - `4`: Fix application failed
//! - `10`: Internal errors (bugs, unexpected state, malformed syntax trees)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or configuration from the caller.
    InvalidArguments = 2,
    /// A file or directory could not be found.
    ResolutionError = 3,
    /// Fixes could not be written.
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum TidyError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Rule or file configuration failed validation.
    #[error("invalid configuration for {scope}: {reason}")]
    InvalidConfig { scope: String, reason: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to write fixed output.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&TidyError> for OutputErrorCode {
    fn from(err: &TidyError) -> Self {
        match err {
            TidyError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TidyError::InvalidConfig { .. } => OutputErrorCode::InvalidArguments,
            TidyError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            TidyError::ApplyError { .. } => OutputErrorCode::ApplyError,
            TidyError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<std::io::Error> for TidyError {
    fn from(err: std::io::Error) -> Self {
        TidyError::InternalError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for TidyError {
    fn from(err: serde_json::Error) -> Self {
        TidyError::InternalError {
            message: format!("JSON error: {}", err),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TidyError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TidyError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        TidyError::InvalidConfig {
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        TidyError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TidyError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
