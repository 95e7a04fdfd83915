//! Field mapping types exchanged with the extraction backend.
//!
//! A mapping batch is produced by the backend inference service for one
//! extracted statement table. Each entry pairs a column found in the table
//! with a field in the commission database schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// A suggested mapping from an extracted column to a database field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Column header as produced by table extraction.
    pub extracted_field: String,
    /// Display name of the suggested target field.
    pub mapped_to: String,
    /// Confidence score (0.0 to 1.0) for this mapping.
    pub confidence: f64,
    /// Id of the suggested target field, when the backend resolved one.
    #[serde(default)]
    pub database_field_id: Option<String>,
}

/// A field in the destination schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseField {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl DatabaseField {
    /// Decode the reference list as returned by the backend.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| MappingError::payload("database fields", &e))
    }
}

/// Response of the AI field-mapping endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFieldMappingResponse {
    pub mappings: Vec<FieldMapping>,
    /// True when the suggestions were seeded from a previously learned format.
    #[serde(default)]
    pub learned_format_used: bool,
    #[serde(default)]
    pub overall_confidence: f64,
}

impl AiFieldMappingResponse {
    /// Decode a mapping batch as returned by the backend.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MappingError::payload("mapping batch", &e))
    }
}

/// Review status of one mapping row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Not yet decided.
    #[default]
    Pending,
    /// Include in the final mapping.
    Approved,
    /// Exclude from the final mapping.
    Skipped,
}

impl RowStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Skipped => "skipped",
        }
    }

    /// True once the user has made a decision for the row.
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
