//! Values handed back to the caller after each change and at submit time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RowStatus;

/// State pushed to the component that persists the review.
///
/// Built from the store after a mutation has completed, so it always pairs
/// the latest row statuses with the latest dropdown selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSnapshot {
    pub row_statuses: BTreeMap<String, RowStatus>,
    pub edited_statement_fields: BTreeMap<String, String>,
    pub duplicate_fields: Vec<String>,
    pub database_field_selections: BTreeMap<String, String>,
    /// Reconciled `extracted_field -> target display name` mapping.
    pub field_mapping: BTreeMap<String, String>,
    pub pending_count: usize,
    pub can_submit: bool,
}

/// Final decisions for the "save field mapping" step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Reconciled mapping keyed by the original extracted field.
    pub field_mapping: BTreeMap<String, String>,
    /// Label each approved extracted field is stored under.
    pub statement_field_labels: BTreeMap<String, String>,
    pub skipped_fields: Vec<String>,
    pub learned_format_used: bool,
}
