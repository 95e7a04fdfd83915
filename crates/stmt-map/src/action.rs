//! User decisions as data, so a review can be replayed.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};
use crate::snapshot::MappingSnapshot;
use crate::state::MappingState;

/// One user decision in the review table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewAction {
    Approve {
        field: String,
    },
    Skip {
        field: String,
    },
    Revert {
        field: String,
    },
    EditStatementField {
        field: String,
        name: String,
    },
    SelectDatabaseField {
        field: String,
        database_field_id: String,
    },
    AcceptAll,
}

impl ReviewAction {
    /// Apply the decision and return the resulting snapshot.
    pub fn apply(&self, state: &mut MappingState) -> Result<MappingSnapshot> {
        match self {
            Self::Approve { field } => state.approve(field),
            Self::Skip { field } => state.skip(field),
            Self::Revert { field } => state.revert(field),
            Self::EditStatementField { field, name } => {
                state.edit_statement_field(field, name.as_str())
            }
            Self::SelectDatabaseField {
                field,
                database_field_id,
            } => state.set_database_field_selection(field, database_field_id),
            Self::AcceptAll => Ok(state.accept_all()),
        }
    }

    /// Extracted field the decision targets; `None` for bulk actions.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Approve { field }
            | Self::Skip { field }
            | Self::Revert { field }
            | Self::EditStatementField { field, .. }
            | Self::SelectDatabaseField { field, .. } => Some(field),
            Self::AcceptAll => None,
        }
    }

    /// Decode a JSON array of decisions.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| MappingError::payload("review actions", &e))
    }
}

/// Apply decisions in order, stopping at the first failure.
///
/// Returns the snapshot after the last decision, or the current snapshot
/// when there is nothing to apply.
pub fn apply_all(state: &mut MappingState, actions: &[ReviewAction]) -> Result<MappingSnapshot> {
    let mut snapshot = state.snapshot();
    for action in actions {
        snapshot = action.apply(state)?;
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_actions() {
        let json = r#"[
            {"action":"approve","field":"Plan"},
            {"action":"select_database_field","field":"Plan","database_field_id":"coverage"},
            {"action":"edit_statement_field","field":"Grp","name":"GroupID"},
            {"action":"accept_all"}
        ]"#;
        let actions = ReviewAction::list_from_json(json).unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[1].field(), Some("Plan"));
        assert_eq!(actions[3], ReviewAction::AcceptAll);
    }

    #[test]
    fn unknown_action_is_an_error() {
        let err = ReviewAction::list_from_json(r#"[{"action":"delete","field":"x"}]"#)
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidPayload { .. }));
    }
}
