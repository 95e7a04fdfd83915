//! Reconciliation of AI suggestions, row decisions and user overrides.
//!
//! The final mapping is built in layers, later layers winning:
//!
//! 1. The AI suggestion (`mapped_to`) for every approved row.
//! 2. The database field picked in the dropdown, resolved to its display
//!    name, again only for approved rows.
//! 3. Statement-field renames. These change the label the extracted column
//!    is persisted under and the name used for duplicate detection; they
//!    never change the target a row maps to.
//!
//! Rows that are pending or skipped do not appear in the output, whatever
//! selection may still be recorded for them.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{DatabaseField, FieldMapping, RowStatus};

/// Merge the review layers into one `extracted_field -> target display name` map.
///
/// `row_statuses` entries that are missing count as pending. Selections that
/// reference an unknown database field leave the AI suggestion in place.
pub fn reconcile(
    mappings: &[FieldMapping],
    row_statuses: &BTreeMap<String, RowStatus>,
    database_field_selections: &BTreeMap<String, String>,
    database_fields: &[DatabaseField],
) -> BTreeMap<String, String> {
    let display_names: BTreeMap<&str, &str> = database_fields
        .iter()
        .map(|f| (f.id.as_str(), f.display_name.as_str()))
        .collect();

    let mut result = BTreeMap::new();
    for mapping in mappings {
        let field = mapping.extracted_field.as_str();
        if status_of(row_statuses, field) != RowStatus::Approved {
            continue;
        }

        let mut target = mapping.mapped_to.as_str();
        if let Some(selected_id) = database_field_selections.get(field) {
            match display_names.get(selected_id.as_str()) {
                Some(&display_name) => target = display_name,
                None => tracing::warn!(
                    field,
                    database_field_id = %selected_id,
                    "selected database field is unknown, keeping AI suggestion"
                ),
            }
        }
        result.insert(field.to_string(), target.to_string());
    }
    result
}

/// Name the extracted field is persisted and checked under.
///
/// A blank rename falls back to the original header.
pub fn effective_name<'a>(field: &'a str, edited: &'a BTreeMap<String, String>) -> &'a str {
    match edited.get(field).map(|name| name.trim()) {
        Some(name) if !name.is_empty() => name,
        _ => field,
    }
}

/// Effective statement-field names that more than one row resolves to.
///
/// Every row of the batch takes part, whatever its status. The result is
/// sorted and free of repeats.
pub fn find_duplicate_fields(
    mappings: &[FieldMapping],
    edited_statement_fields: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for mapping in mappings {
        let name = effective_name(&mapping.extracted_field, edited_statement_fields);
        if !seen.insert(name) {
            duplicates.insert(name);
        }
    }
    duplicates.into_iter().map(str::to_string).collect()
}

/// Statement-field labels for approved rows: original header to effective name.
pub fn statement_field_labels(
    mappings: &[FieldMapping],
    row_statuses: &BTreeMap<String, RowStatus>,
    edited_statement_fields: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    mappings
        .iter()
        .filter(|m| status_of(row_statuses, &m.extracted_field) == RowStatus::Approved)
        .map(|m| {
            (
                m.extracted_field.clone(),
                effective_name(&m.extracted_field, edited_statement_fields).to_string(),
            )
        })
        .collect()
}

pub(crate) fn status_of(row_statuses: &BTreeMap<String, RowStatus>, field: &str) -> RowStatus {
    row_statuses.get(field).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(field: &str, mapped_to: &str, id: Option<&str>) -> FieldMapping {
        FieldMapping {
            extracted_field: field.to_string(),
            mapped_to: mapped_to.to_string(),
            confidence: 0.8,
            database_field_id: id.map(String::from),
        }
    }

    fn db(id: &str, name: &str) -> DatabaseField {
        DatabaseField {
            id: id.to_string(),
            display_name: name.to_string(),
            description: None,
        }
    }

    fn statuses(entries: &[(&str, RowStatus)]) -> BTreeMap<String, RowStatus> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn unknown_selection_keeps_suggestion() {
        let mappings = vec![mapping("Plan", "Plan Type", None)];
        let selections = BTreeMap::from([("Plan".to_string(), "gone".to_string())]);
        let result = reconcile(
            &mappings,
            &statuses(&[("Plan", RowStatus::Approved)]),
            &selections,
            &[db("plan_type", "Plan Type")],
        );
        assert_eq!(result["Plan"], "Plan Type");
    }

    #[test]
    fn missing_status_counts_as_pending() {
        let mappings = vec![mapping("Rep", "Agent", None)];
        let result = reconcile(&mappings, &BTreeMap::new(), &BTreeMap::new(), &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn rename_does_not_change_target() {
        let mappings = vec![mapping("Grp #", "Group Number", Some("group_no"))];
        let row_statuses = statuses(&[("Grp #", RowStatus::Approved)]);
        let edited = BTreeMap::from([("Grp #".to_string(), "Group".to_string())]);
        let selections = BTreeMap::from([("Grp #".to_string(), "group_no".to_string())]);
        let fields = [db("group_no", "Group Number")];

        let result = reconcile(&mappings, &row_statuses, &selections, &fields);
        assert_eq!(result["Grp #"], "Group Number");

        let labels = statement_field_labels(&mappings, &row_statuses, &edited);
        assert_eq!(labels["Grp #"], "Group");
    }

    #[test]
    fn blank_rename_falls_back_to_original() {
        let edited = BTreeMap::from([("Rep".to_string(), "   ".to_string())]);
        assert_eq!(effective_name("Rep", &edited), "Rep");
    }

    #[test]
    fn rename_onto_existing_header_collides() {
        let mappings = vec![mapping("Group", "Group", None), mapping("Grp", "Group", None)];
        let edited = BTreeMap::from([("Group".to_string(), "Grp".to_string())]);
        assert_eq!(find_duplicate_fields(&mappings, &edited), vec!["Grp"]);
    }
}
