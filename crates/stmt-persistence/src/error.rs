//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a review session.
    #[error("Invalid session file format")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Unsupported schema version.
    #[error("Session file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Failed to serialize session data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization error.
    #[error("Failed to deserialize session data")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid review session: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This session was saved by a newer version \
                    (file version {}, this version supports up to {}).",
                    found, max_supported
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the review session.".to_string()
            }
            Self::Deserialization { path, .. } => {
                format!(
                    "The review session at {} could not be read. The file may be corrupted.",
                    path.display()
                )
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Make sure you selected a saved review session.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update to the latest release.".into()),
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => {
                Some("Start a new review from the original mapping batch.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
