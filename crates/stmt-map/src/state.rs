//! Mapping state for the statement review workflow.
//!
//! One `MappingState` lives for one review session: it is created when a
//! mapping batch loads, mutated as the user approves, skips, renames and
//! overrides rows, and consumed into a [`SubmissionPayload`] on submit.
//!
//! Every mutator returns the [`MappingSnapshot`] computed after the change,
//! so callers never notify with a selection captured earlier.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::{ConfidenceLevel, ConfidenceThresholds, ReviewConfig};
use crate::error::{MappingError, Result};
use crate::gate::ValidationGate;
use crate::reconcile::{effective_name, reconcile, statement_field_labels, status_of};
use crate::snapshot::{MappingSnapshot, SubmissionPayload};
use crate::types::{AiFieldMappingResponse, DatabaseField, FieldMapping, RowStatus};

/// Review state of one mapping batch.
///
/// Deserializing re-runs the batch checks of [`MappingState::load`] and
/// rejects decisions keyed by fields the batch does not contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMappingState")]
pub struct MappingState {
    /// AI suggestions in batch order. Never changed after load.
    mappings: Vec<FieldMapping>,
    /// Valid targets for dropdown selections.
    database_fields: Vec<DatabaseField>,
    learned_format_used: bool,
    overall_confidence: f64,
    row_statuses: BTreeMap<String, RowStatus>,
    /// Rows approved by policy at load time.
    auto_approved: BTreeSet<String>,
    edited_statement_fields: BTreeMap<String, String>,
    database_field_selections: BTreeMap<String, String>,
}

impl MappingState {
    /// Create the state for a freshly fetched mapping batch.
    ///
    /// Rows start pending unless the batch reuses a learned format and the
    /// row's confidence reaches the configured threshold. Dropdown selections
    /// start at the AI-suggested database field.
    pub fn load(
        response: AiFieldMappingResponse,
        database_fields: Vec<DatabaseField>,
        config: &ReviewConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_batch(&response.mappings)?;

        let mut row_statuses = BTreeMap::new();
        let mut auto_approved = BTreeSet::new();
        let mut database_field_selections = BTreeMap::new();
        for mapping in &response.mappings {
            let field = mapping.extracted_field.clone();
            let status = if config.auto_approves(response.learned_format_used, mapping.confidence)
            {
                auto_approved.insert(field.clone());
                RowStatus::Approved
            } else {
                RowStatus::Pending
            };
            if let Some(id) = &mapping.database_field_id {
                database_field_selections.insert(field.clone(), id.clone());
            }
            row_statuses.insert(field, status);
        }

        tracing::info!(
            fields = response.mappings.len(),
            auto_approved = auto_approved.len(),
            learned_format_used = response.learned_format_used,
            "loaded mapping batch"
        );

        Ok(Self {
            mappings: response.mappings,
            database_fields,
            learned_format_used: response.learned_format_used,
            overall_confidence: response.overall_confidence,
            row_statuses,
            auto_approved,
            edited_statement_fields: BTreeMap::new(),
            database_field_selections,
        })
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Mark a row approved.
    pub fn approve(&mut self, field: &str) -> Result<MappingSnapshot> {
        self.set_status(field, RowStatus::Approved)
    }

    /// Mark a row skipped.
    pub fn skip(&mut self, field: &str) -> Result<MappingSnapshot> {
        self.set_status(field, RowStatus::Skipped)
    }

    /// Return a row to pending and restore the AI suggestion.
    ///
    /// Drops any rename and puts the dropdown back on the suggested database
    /// field. When the batch suggested no database field the selection is
    /// removed.
    pub fn revert(&mut self, field: &str) -> Result<MappingSnapshot> {
        let suggested = self.mapping(field)?.database_field_id.clone();
        self.row_statuses
            .insert(field.to_string(), RowStatus::Pending);
        self.edited_statement_fields.remove(field);
        match suggested {
            Some(id) => {
                self.database_field_selections.insert(field.to_string(), id);
            }
            None => {
                self.database_field_selections.remove(field);
            }
        }
        tracing::debug!(field, "reverted row to suggestion");
        Ok(self.snapshot())
    }

    /// Rename the statement field an extracted column is stored under.
    ///
    /// A blank name clears the rename.
    pub fn edit_statement_field(
        &mut self,
        field: &str,
        new_name: impl Into<String>,
    ) -> Result<MappingSnapshot> {
        self.mapping(field)?;
        let new_name = new_name.into();
        if new_name.trim().is_empty() {
            self.edited_statement_fields.remove(field);
        } else {
            tracing::debug!(field, new_name = %new_name, "renamed statement field");
            self.edited_statement_fields
                .insert(field.to_string(), new_name);
        }
        Ok(self.snapshot())
    }

    /// Override the target database field for a row. Status is unchanged.
    pub fn set_database_field_selection(
        &mut self,
        field: &str,
        database_field_id: &str,
    ) -> Result<MappingSnapshot> {
        self.mapping(field)?;
        if self.database_field(database_field_id).is_none() {
            return Err(MappingError::DatabaseFieldNotFound(
                database_field_id.to_string(),
            ));
        }
        tracing::debug!(field, database_field_id, "selected database field");
        self.database_field_selections
            .insert(field.to_string(), database_field_id.to_string());
        Ok(self.snapshot())
    }

    /// Approve every row at once. Selections are left as they are.
    pub fn accept_all(&mut self) -> MappingSnapshot {
        for mapping in &self.mappings {
            self.row_statuses
                .insert(mapping.extracted_field.clone(), RowStatus::Approved);
        }
        tracing::debug!(fields = self.mappings.len(), "approved all rows");
        self.snapshot()
    }

    fn set_status(&mut self, field: &str, status: RowStatus) -> Result<MappingSnapshot> {
        self.mapping(field)?;
        self.row_statuses.insert(field.to_string(), status);
        tracing::debug!(field, status = %status, "updated row status");
        Ok(self.snapshot())
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Reconciled `extracted_field -> target display name` mapping.
    pub fn reconcile(&self) -> BTreeMap<String, String> {
        reconcile(
            &self.mappings,
            &self.row_statuses,
            &self.database_field_selections,
            &self.database_fields,
        )
    }

    /// Evaluate the submit gate.
    pub fn gate(&self) -> ValidationGate {
        ValidationGate::evaluate(
            &self.mappings,
            &self.row_statuses,
            &self.edited_statement_fields,
        )
    }

    /// Current snapshot for the persisting component.
    pub fn snapshot(&self) -> MappingSnapshot {
        let gate = self.gate();
        MappingSnapshot {
            row_statuses: self.row_statuses.clone(),
            edited_statement_fields: self.edited_statement_fields.clone(),
            database_field_selections: self.database_field_selections.clone(),
            field_mapping: self.reconcile(),
            pending_count: gate.pending_count(),
            can_submit: gate.can_submit,
            duplicate_fields: gate.duplicate_fields,
        }
    }

    /// Build the submission, or report what blocks it.
    pub fn submission(&self) -> Result<SubmissionPayload> {
        self.gate().check()?;
        let skipped_fields = self
            .mappings
            .iter()
            .filter(|m| self.status(&m.extracted_field) == RowStatus::Skipped)
            .map(|m| m.extracted_field.clone())
            .collect();
        Ok(SubmissionPayload {
            field_mapping: self.reconcile(),
            statement_field_labels: statement_field_labels(
                &self.mappings,
                &self.row_statuses,
                &self.edited_statement_fields,
            ),
            skipped_fields,
            learned_format_used: self.learned_format_used,
        })
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let mut summary = MappingSummary {
            total: self.mappings.len(),
            auto_approved: self.auto_approved.len(),
            mean_confidence: None,
            ..MappingSummary::default()
        };
        for mapping in &self.mappings {
            match self.status(&mapping.extracted_field) {
                RowStatus::Pending => summary.pending += 1,
                RowStatus::Approved => summary.approved += 1,
                RowStatus::Skipped => summary.skipped += 1,
            }
        }
        if !self.mappings.is_empty() {
            let sum: f64 = self.mappings.iter().map(|m| m.confidence).sum();
            summary.mean_confidence = Some(sum / self.mappings.len() as f64);
        }
        summary
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// AI suggestions in batch order.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn database_fields(&self) -> &[DatabaseField] {
        &self.database_fields
    }

    pub fn learned_format_used(&self) -> bool {
        self.learned_format_used
    }

    pub fn overall_confidence(&self) -> f64 {
        self.overall_confidence
    }

    /// Status of a row; unknown rows read as pending.
    pub fn status(&self, field: &str) -> RowStatus {
        status_of(&self.row_statuses, field)
    }

    /// Whether the row was approved by policy at load time.
    pub fn is_auto_approved(&self, field: &str) -> bool {
        self.auto_approved.contains(field)
    }

    /// Name the row is stored and checked under.
    pub fn effective_name<'a>(&'a self, field: &'a str) -> &'a str {
        effective_name(field, &self.edited_statement_fields)
    }

    /// Database field currently selected for a row.
    pub fn selection(&self, field: &str) -> Option<&DatabaseField> {
        self.database_field_selections
            .get(field)
            .and_then(|id| self.database_field(id))
    }

    pub fn database_field(&self, id: &str) -> Option<&DatabaseField> {
        self.database_fields.iter().find(|f| f.id == id)
    }

    /// Confidence band of a row's suggestion.
    pub fn confidence_level(
        &self,
        field: &str,
        thresholds: &ConfidenceThresholds,
    ) -> Option<ConfidenceLevel> {
        self.mapping(field)
            .ok()
            .and_then(|m| thresholds.categorize(m.confidence))
    }

    fn mapping(&self, field: &str) -> Result<&FieldMapping> {
        self.mappings
            .iter()
            .find(|m| m.extracted_field == field)
            .ok_or_else(|| MappingError::FieldNotFound(field.to_string()))
    }
}

/// Reject repeated extracted fields and confidence outside `[0, 1]`.
fn check_batch(mappings: &[FieldMapping]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for mapping in mappings {
        if !seen.insert(mapping.extracted_field.as_str()) {
            return Err(MappingError::DuplicateExtractedField(
                mapping.extracted_field.clone(),
            ));
        }
        if !(0.0..=1.0).contains(&mapping.confidence) {
            return Err(MappingError::InvalidConfidence {
                field: mapping.extracted_field.clone(),
                confidence: mapping.confidence,
            });
        }
    }
    Ok(())
}

/// Wire form of [`MappingState`], checked before use.
#[derive(Deserialize)]
struct RawMappingState {
    mappings: Vec<FieldMapping>,
    database_fields: Vec<DatabaseField>,
    learned_format_used: bool,
    overall_confidence: f64,
    row_statuses: BTreeMap<String, RowStatus>,
    #[serde(default)]
    auto_approved: BTreeSet<String>,
    #[serde(default)]
    edited_statement_fields: BTreeMap<String, String>,
    #[serde(default)]
    database_field_selections: BTreeMap<String, String>,
}

impl TryFrom<RawMappingState> for MappingState {
    type Error = MappingError;

    fn try_from(raw: RawMappingState) -> Result<Self> {
        check_batch(&raw.mappings)?;

        let known: BTreeSet<&str> = raw
            .mappings
            .iter()
            .map(|m| m.extracted_field.as_str())
            .collect();
        if let Some(missing) = known.iter().find(|f| !raw.row_statuses.contains_key(**f)) {
            return Err(MappingError::InvalidPayload {
                what: "review state",
                message: format!("no status for field '{missing}'"),
            });
        }
        let stray = raw
            .row_statuses
            .keys()
            .chain(&raw.auto_approved)
            .chain(raw.edited_statement_fields.keys())
            .chain(raw.database_field_selections.keys())
            .find(|f| !known.contains(f.as_str()));
        if let Some(field) = stray {
            return Err(MappingError::FieldNotFound(field.clone()));
        }

        Ok(Self {
            mappings: raw.mappings,
            database_fields: raw.database_fields,
            learned_format_used: raw.learned_format_used,
            overall_confidence: raw.overall_confidence,
            row_statuses: raw.row_statuses,
            auto_approved: raw.auto_approved,
            edited_statement_fields: raw.edited_statement_fields,
            database_field_selections: raw.database_field_selections,
        })
    }
}

/// Summary of review counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MappingSummary {
    pub total: usize,
    pub approved: usize,
    pub skipped: usize,
    pub pending: usize,
    /// Rows approved by policy at load time (they may since have changed).
    pub auto_approved: usize,
    /// Mean AI confidence across the batch.
    pub mean_confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(learned: bool) -> AiFieldMappingResponse {
        AiFieldMappingResponse {
            mappings: vec![
                FieldMapping {
                    extracted_field: "Grp #".into(),
                    mapped_to: "Group Number".into(),
                    confidence: 0.95,
                    database_field_id: Some("group_no".into()),
                },
                FieldMapping {
                    extracted_field: "Rep".into(),
                    mapped_to: "Agent".into(),
                    confidence: 0.6,
                    database_field_id: None,
                },
            ],
            learned_format_used: learned,
            overall_confidence: 0.78,
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        assert_eq!(
            state.approve("Nope"),
            Err(MappingError::FieldNotFound("Nope".into()))
        );
    }

    #[test]
    fn duplicate_extracted_field_is_rejected() {
        let mut response = batch(false);
        response.mappings.push(response.mappings[0].clone());
        let err = MappingState::load(response, vec![], &ReviewConfig::default()).unwrap_err();
        assert_eq!(err, MappingError::DuplicateExtractedField("Grp #".into()));
    }

    #[test]
    fn selections_seeded_from_suggestion() {
        let state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        let snapshot = state.snapshot();
        assert_eq!(
            snapshot.database_field_selections.get("Grp #").map(String::as_str),
            Some("group_no")
        );
        assert!(!snapshot.database_field_selections.contains_key("Rep"));
    }

    #[test]
    fn summary_counts() {
        let mut state = MappingState::load(batch(true), vec![], &ReviewConfig::default()).unwrap();
        state.skip("Rep").unwrap();
        let summary = state.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.auto_approved, 1);
        assert!(summary.mean_confidence.is_some());
    }

    #[test]
    fn blank_rename_clears_edit() {
        let mut state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        state.edit_statement_field("Rep", "Agent Name").unwrap();
        assert_eq!(state.effective_name("Rep"), "Agent Name");
        let snapshot = state.edit_statement_field("Rep", " ").unwrap();
        assert!(snapshot.edited_statement_fields.is_empty());
        assert_eq!(state.effective_name("Rep"), "Rep");
    }

    #[test]
    fn restored_state_round_trips() {
        let mut state = MappingState::load(batch(true), vec![], &ReviewConfig::default()).unwrap();
        state.edit_statement_field("Rep", "Agent").unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: MappingState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn restored_state_needs_status_for_every_row() {
        let state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        let mut value = serde_json::to_value(&state).unwrap();
        value["row_statuses"].as_object_mut().unwrap().remove("Rep");
        let err = serde_json::from_value::<MappingState>(value).unwrap_err();
        assert!(err.to_string().contains("no status for field 'Rep'"));
    }

    #[test]
    fn restored_state_rejects_unknown_fields() {
        let state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        let mut value = serde_json::to_value(&state).unwrap();
        value["edited_statement_fields"]["Premium"] = serde_json::json!("Prem");
        let err = serde_json::from_value::<MappingState>(value).unwrap_err();
        assert!(err.to_string().contains("Premium"));
    }

    #[test]
    fn restored_state_rechecks_batch() {
        let state = MappingState::load(batch(false), vec![], &ReviewConfig::default()).unwrap();
        let mut value = serde_json::to_value(&state).unwrap();
        value["mappings"][1]["confidence"] = serde_json::json!(1.5);
        assert!(serde_json::from_value::<MappingState>(value.clone()).is_err());

        value["mappings"][1]["confidence"] = serde_json::json!(0.6);
        value["mappings"][1]["extracted_field"] = serde_json::json!("Grp #");
        let err = serde_json::from_value::<MappingState>(value).unwrap_err();
        assert!(err.to_string().contains("Grp #"));
    }
}
