//! Scheme file error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading, validating, or writing a scheme document.
#[derive(Debug, Error)]
pub enum FormatError {
    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be moved over the target.
    #[error("failed to complete save to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, wrong types, or a rule entry missing a field.
    #[error("malformed scheme document: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown classification mode '{mode}' (expected 'bins' or 'exact')")]
    UnknownMode { mode: String },

    #[error("invalid color '{value}' in {field}")]
    InvalidColor { field: String, value: String },

    #[error("edge width must not be negative (got {value})")]
    NegativeEdgeWidth { value: f64 },

    /// JSON has no spelling for NaN or infinity.
    #[error("{field} is not a finite number")]
    NonFiniteNumber { field: String },
}

impl FormatError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the scheme file at {}", operation, path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the scheme to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            other => format!("Failed to load the scheme:\n{other}"),
        }
    }
}

/// Result type alias for scheme operations.
pub type Result<T> = std::result::Result<T, FormatError>;
