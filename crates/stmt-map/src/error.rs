//! Error types for field-mapping review operations.

use thiserror::Error;

/// Errors from field-mapping review operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MappingError {
    /// Extracted field is not part of the loaded mapping batch.
    #[error("Field not found in mapping batch: {0}")]
    FieldNotFound(String),

    /// Database field id is not in the reference list.
    #[error("Database field not found: {0}")]
    DatabaseFieldNotFound(String),

    /// The same extracted field appears twice in one batch.
    #[error("Extracted field '{0}' appears more than once in the mapping batch")]
    DuplicateExtractedField(String),

    /// Confidence outside `[0, 1]`.
    #[error("Confidence {confidence} for field '{field}' is outside [0, 1]")]
    InvalidConfidence {
        /// The extracted field carrying the bad score.
        field: String,
        /// The score as received.
        confidence: f64,
    },

    /// Configured threshold outside `[0, 1]`.
    #[error("Threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    /// Submission attempted while rows are still pending.
    #[error("{count} field(s) still pending review")]
    PendingFields {
        /// Number of pending rows.
        count: usize,
        /// Names of the pending rows, in batch order.
        fields: Vec<String>,
    },

    /// Submission attempted while effective statement-field names collide.
    #[error("Duplicate statement field names: {}", .0.join(", "))]
    DuplicateFields(Vec<String>),

    /// Payload could not be decoded.
    #[error("Invalid {what} payload: {message}")]
    InvalidPayload {
        /// Which payload failed (mapping batch, database fields, actions).
        what: &'static str,
        /// Decoder message.
        message: String,
    },
}

impl MappingError {
    /// Get the extracted field associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound(f) | Self::DuplicateExtractedField(f) => Some(f),
            Self::InvalidConfidence { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Check if this error is recoverable by further user review.
    ///
    /// The submit-gate errors clear once the user resolves the listed rows;
    /// everything else means the inputs themselves are wrong.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PendingFields { .. }
                | Self::DuplicateFields(_)
                | Self::FieldNotFound(_)
                | Self::DatabaseFieldNotFound(_)
        )
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::PendingFields { .. } => {
                Some("Approve or skip every remaining field before submitting.")
            }
            Self::DuplicateFields(_) => {
                Some("Rename the listed statement fields so each name is unique.")
            }
            Self::FieldNotFound(_) => Some("Check the field name against the mapping batch."),
            Self::DatabaseFieldNotFound(_) => {
                Some("Pick a target from the database field list.")
            }
            Self::DuplicateExtractedField(_) | Self::InvalidConfidence { .. } => {
                Some("Re-run field mapping for this statement; the batch is malformed.")
            }
            _ => None,
        }
    }

    pub(crate) fn payload(what: &'static str, err: &serde_json::Error) -> Self {
        Self::InvalidPayload {
            what,
            message: err.to_string(),
        }
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
