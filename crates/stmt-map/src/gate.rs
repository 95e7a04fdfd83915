//! Submit gate for a review session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::reconcile::{find_duplicate_fields, status_of};
use crate::types::{FieldMapping, RowStatus};

/// Whether the current review may be submitted, and why not.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationGate {
    pub can_submit: bool,
    /// Rows still pending, in batch order.
    pub pending_fields: Vec<String>,
    /// Effective statement-field names shared by more than one row.
    pub duplicate_fields: Vec<String>,
}

impl ValidationGate {
    /// Evaluate the gate over a batch.
    pub fn evaluate(
        mappings: &[FieldMapping],
        row_statuses: &BTreeMap<String, RowStatus>,
        edited_statement_fields: &BTreeMap<String, String>,
    ) -> Self {
        let pending_fields: Vec<String> = mappings
            .iter()
            .filter(|m| !status_of(row_statuses, &m.extracted_field).is_resolved())
            .map(|m| m.extracted_field.clone())
            .collect();
        let duplicate_fields = find_duplicate_fields(mappings, edited_statement_fields);
        Self {
            can_submit: pending_fields.is_empty() && duplicate_fields.is_empty(),
            pending_fields,
            duplicate_fields,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending_fields.len()
    }

    /// Convert a closed gate into the blocking error, pending rows first.
    pub fn check(&self) -> Result<(), MappingError> {
        if !self.pending_fields.is_empty() {
            return Err(MappingError::PendingFields {
                count: self.pending_fields.len(),
                fields: self.pending_fields.clone(),
            });
        }
        if !self.duplicate_fields.is_empty() {
            return Err(MappingError::DuplicateFields(self.duplicate_fields.clone()));
        }
        Ok(())
    }
}
