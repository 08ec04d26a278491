//! Error types for the leak-rate engine.
//!
//! Every error carries a stable numeric code and a category so the CLI can
//! report failures in machine-readable form:
//! ```json
//! {
//!   "code": 21,
//!   "category": "fit",
//!   "message": "fit of lognorm failed: data must be > loc (0)",
//!   "recoverable": true
//! }
//! ```

use ldar_config::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Program configuration errors.
    Config,
    /// Distribution construction and fitting errors.
    Fit,
    /// Leak sampling and unit conversion errors.
    Sampling,
    /// File I/O and serialization errors.
    Io,
    /// Remote weather data errors.
    Network,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Fit => write!(f, "fit"),
            ErrorCategory::Sampling => write!(f, "sampling"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Network => write!(f, "network"),
        }
    }
}

/// Unified error type for the leak-rate engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid program: {0}")]
    Validation(#[from] ValidationError),

    #[error("unsupported distribution family: {name}")]
    UnknownFamily { name: String },

    #[error("invalid shape parameters: {0}")]
    InvalidShape(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Fit errors (20-29)
    #[error("invalid {family} parameters: {reason}")]
    InvalidParameters { family: String, reason: String },

    #[error("fit of {family} failed: {reason}")]
    FitFailed { family: String, reason: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    // Sampling errors (30-39)
    #[error("unknown {kind} unit: {name}")]
    UnknownUnit { kind: &'static str, name: String },

    // I/O errors (60-69)
    #[error("cannot read leak rates from {}: {reason}", .path.display())]
    SampleFile { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Network errors (70-79)
    #[error("weather data unavailable: {0}")]
    Weather(String),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Fit errors
    /// - 30-39: Sampling errors
    /// - 60-69: I/O errors
    /// - 70-79: Network errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Validation(_) => 10,
            Error::UnknownFamily { .. } => 11,
            Error::InvalidShape(_) => 12,
            Error::InvalidArgument(_) => 13,
            Error::InvalidParameters { .. } => 20,
            Error::FitFailed { .. } => 21,
            Error::InsufficientData(_) => 22,
            Error::UnknownUnit { .. } => 30,
            Error::SampleFile { .. } => 60,
            Error::Io(_) => 61,
            Error::Json(_) => 62,
            Error::Weather(_) => 70,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_)
            | Error::UnknownFamily { .. }
            | Error::InvalidShape(_)
            | Error::InvalidArgument(_) => ErrorCategory::Config,
            Error::InvalidParameters { .. }
            | Error::FitFailed { .. }
            | Error::InsufficientData(_) => ErrorCategory::Fit,
            Error::UnknownUnit { .. } => ErrorCategory::Sampling,
            Error::SampleFile { .. } | Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
            Error::Weather(_) => ErrorCategory::Network,
        }
    }

    /// Returns whether this error is potentially recoverable by the user
    /// (fixing input files, credentials, or connectivity).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Json(_))
    }

    /// Structured form for JSON output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "category": self.category(),
            "message": self.to_string(),
            "recoverable": self.is_recoverable(),
        })
    }
}
