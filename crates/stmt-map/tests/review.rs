//! Review workflow tests: auto-approval, precedence, revert and the submit gate.

use stmt_map::{
    AiFieldMappingResponse, DatabaseField, FieldMapping, MappingError, MappingState,
    ReviewAction, ReviewConfig, RowStatus, apply_all,
};

fn mapping(field: &str, mapped_to: &str, confidence: f64, id: Option<&str>) -> FieldMapping {
    FieldMapping {
        extracted_field: field.to_string(),
        mapped_to: mapped_to.to_string(),
        confidence,
        database_field_id: id.map(String::from),
    }
}

fn db(id: &str, display_name: &str) -> DatabaseField {
    DatabaseField {
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: None,
    }
}

fn database_fields() -> Vec<DatabaseField> {
    vec![
        db("group_no", "Group Number"),
        db("plan_type", "Plan Type"),
        db("coverage_type", "Coverage Type"),
        db("agent", "Agent"),
        db("group_id", "Group ID"),
    ]
}

fn load(mappings: Vec<FieldMapping>, learned_format_used: bool) -> MappingState {
    let response = AiFieldMappingResponse {
        mappings,
        learned_format_used,
        overall_confidence: 0.8,
    };
    MappingState::load(response, database_fields(), &ReviewConfig::default())
        .expect("load batch")
}

#[test]
fn learned_format_auto_approves_confident_rows() {
    let state = load(
        vec![
            mapping("Grp #", "Group Number", 0.95, Some("group_no")),
            mapping("Rep", "Agent", 0.6, Some("agent")),
        ],
        true,
    );

    let snapshot = state.snapshot();
    assert_eq!(snapshot.row_statuses["Grp #"], RowStatus::Approved);
    assert_eq!(snapshot.row_statuses["Rep"], RowStatus::Pending);
    assert!(state.is_auto_approved("Grp #"));
    assert!(!state.is_auto_approved("Rep"));
}

#[test]
fn fresh_format_starts_everything_pending() {
    let state = load(
        vec![mapping("Grp #", "Group Number", 0.99, Some("group_no"))],
        false,
    );
    assert_eq!(state.status("Grp #"), RowStatus::Pending);
    assert_eq!(state.summary().auto_approved, 0);
}

#[test]
fn custom_threshold_is_honoured() {
    let response = AiFieldMappingResponse {
        mappings: vec![mapping("Rep", "Agent", 0.8, None)],
        learned_format_used: true,
        overall_confidence: 0.8,
    };
    let config = ReviewConfig::default().with_auto_approve_threshold(0.75);
    let state = MappingState::load(response, database_fields(), &config).unwrap();
    assert_eq!(state.status("Rep"), RowStatus::Approved);
}

#[test]
fn dropdown_selection_beats_ai_suggestion() {
    let mut state = load(
        vec![mapping("Plan", "Plan Type", 0.7, Some("plan_type"))],
        false,
    );
    state.approve("Plan").unwrap();
    let snapshot = state
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();

    assert_eq!(snapshot.field_mapping["Plan"], "Coverage Type");
    assert_eq!(state.reconcile()["Plan"], "Coverage Type");
}

#[test]
fn selection_does_not_change_status() {
    let mut state = load(vec![mapping("Plan", "Plan Type", 0.7, None)], false);
    let snapshot = state
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();
    assert_eq!(snapshot.row_statuses["Plan"], RowStatus::Pending);
    assert!(snapshot.field_mapping.is_empty());
}

#[test]
fn unknown_database_field_is_rejected() {
    let mut state = load(vec![mapping("Plan", "Plan Type", 0.7, None)], false);
    let err = state
        .set_database_field_selection("Plan", "not_a_field")
        .unwrap_err();
    assert_eq!(err, MappingError::DatabaseFieldNotFound("not_a_field".into()));
}

#[test]
fn skipped_rows_never_reach_the_mapping() {
    let mut state = load(
        vec![
            mapping("Plan", "Plan Type", 0.7, Some("plan_type")),
            mapping("Rep", "Agent", 0.7, Some("agent")),
        ],
        false,
    );
    state.approve("Rep").unwrap();
    state
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();
    let snapshot = state.skip("Plan").unwrap();

    assert!(!snapshot.field_mapping.contains_key("Plan"));
    assert_eq!(snapshot.field_mapping["Rep"], "Agent");
    // The stale selection is kept but ignored.
    assert_eq!(snapshot.database_field_selections["Plan"], "coverage_type");
}

#[test]
fn revert_restores_suggestion_not_blank() {
    let mut state = load(
        vec![mapping("Plan", "Plan Type", 0.7, Some("plan_type"))],
        false,
    );
    state.approve("Plan").unwrap();
    state
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();
    state.edit_statement_field("Plan", "Plan Code").unwrap();

    let snapshot = state.revert("Plan").unwrap();

    assert_eq!(snapshot.database_field_selections["Plan"], "plan_type");
    assert_eq!(snapshot.row_statuses["Plan"], RowStatus::Pending);
    assert!(!snapshot.edited_statement_fields.contains_key("Plan"));
    assert_eq!(state.selection("Plan").map(|f| f.id.as_str()), Some("plan_type"));
}

#[test]
fn revert_without_suggested_id_clears_selection() {
    let mut state = load(vec![mapping("Rep", "Agent", 0.7, None)], false);
    state.set_database_field_selection("Rep", "agent").unwrap();
    let snapshot = state.revert("Rep").unwrap();
    assert!(!snapshot.database_field_selections.contains_key("Rep"));
}

#[test]
fn revert_of_auto_approved_row_goes_pending() {
    let mut state = load(vec![mapping("Grp #", "Group Number", 0.97, None)], true);
    assert_eq!(state.status("Grp #"), RowStatus::Approved);
    let snapshot = state.revert("Grp #").unwrap();
    assert_eq!(snapshot.row_statuses["Grp #"], RowStatus::Pending);
    assert!(!snapshot.can_submit);
}

#[test]
fn gate_blocks_on_pending() {
    let mut state = load(
        vec![
            mapping("Grp #", "Group Number", 0.95, None),
            mapping("Rep", "Agent", 0.6, None),
        ],
        true,
    );
    let gate = state.gate();
    assert!(!gate.can_submit);
    assert_eq!(gate.pending_count(), 1);
    assert_eq!(gate.pending_fields, vec!["Rep"]);

    let snapshot = state.skip("Rep").unwrap();
    assert!(snapshot.can_submit);
    assert_eq!(snapshot.pending_count, 0);

    state.revert("Rep").unwrap();
    assert!(!state.gate().can_submit);
    let snapshot = state.approve("Rep").unwrap();
    assert!(snapshot.can_submit);
}

#[test]
fn duplicate_renames_block_until_resolved() {
    let mut state = load(
        vec![
            mapping("Group", "Group ID", 0.8, Some("group_id")),
            mapping("Grp", "Group ID", 0.8, Some("group_id")),
        ],
        false,
    );
    state.accept_all();
    state.edit_statement_field("Group", "GroupID").unwrap();
    let snapshot = state.edit_statement_field("Grp", "GroupID").unwrap();

    assert_eq!(snapshot.duplicate_fields, vec!["GroupID"]);
    assert!(!snapshot.can_submit);
    assert_eq!(
        state.submission().unwrap_err(),
        MappingError::DuplicateFields(vec!["GroupID".into()])
    );

    let snapshot = state.edit_statement_field("Grp", "GroupAlt").unwrap();
    assert!(snapshot.duplicate_fields.is_empty());
    assert!(snapshot.can_submit);
}

#[test]
fn accept_all_keeps_overrides() {
    let mut state = load(
        vec![
            mapping("Plan", "Plan Type", 0.4, Some("plan_type")),
            mapping("Rep", "Agent", 0.3, None),
        ],
        false,
    );
    state
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();
    let snapshot = state.accept_all();

    assert!(snapshot.row_statuses.values().all(|s| *s == RowStatus::Approved));
    assert_eq!(snapshot.database_field_selections["Plan"], "coverage_type");
    assert_eq!(snapshot.field_mapping["Plan"], "Coverage Type");
    assert_eq!(snapshot.field_mapping["Rep"], "Agent");
    assert!(snapshot.can_submit);
}

#[test]
fn submission_requires_open_gate() {
    let mut state = load(
        vec![
            mapping("Plan", "Plan Type", 0.7, None),
            mapping("Rep", "Agent", 0.7, None),
        ],
        false,
    );
    state.approve("Plan").unwrap();
    match state.submission() {
        Err(MappingError::PendingFields { count, fields }) => {
            assert_eq!(count, 1);
            assert_eq!(fields, vec!["Rep"]);
        }
        other => panic!("expected pending error, got {other:?}"),
    }

    state.skip("Rep").unwrap();
    state.edit_statement_field("Plan", "Plan Code").unwrap();
    let payload = state.submission().expect("gate open");
    assert_eq!(payload.field_mapping.len(), 1);
    assert_eq!(payload.statement_field_labels["Plan"], "Plan Code");
    assert_eq!(payload.skipped_fields, vec!["Rep"]);
    assert!(!payload.learned_format_used);
}

#[test]
fn replayed_actions_match_direct_calls() {
    let mut replayed = load(
        vec![
            mapping("Plan", "Plan Type", 0.7, Some("plan_type")),
            mapping("Rep", "Agent", 0.7, None),
        ],
        false,
    );
    let mut direct = replayed.clone();

    let actions = vec![
        ReviewAction::Approve {
            field: "Plan".into(),
        },
        ReviewAction::SelectDatabaseField {
            field: "Plan".into(),
            database_field_id: "coverage_type".into(),
        },
        ReviewAction::EditStatementField {
            field: "Rep".into(),
            name: "Agent Name".into(),
        },
        ReviewAction::Skip {
            field: "Rep".into(),
        },
    ];
    let replayed_snapshot = apply_all(&mut replayed, &actions).unwrap();

    direct.approve("Plan").unwrap();
    direct
        .set_database_field_selection("Plan", "coverage_type")
        .unwrap();
    direct.edit_statement_field("Rep", "Agent Name").unwrap();
    let direct_snapshot = direct.skip("Rep").unwrap();

    assert_eq!(replayed_snapshot, direct_snapshot);
    assert_eq!(replayed, direct);
}

#[test]
fn replay_stops_at_first_bad_action() {
    let mut state = load(vec![mapping("Rep", "Agent", 0.7, None)], false);
    let actions = vec![
        ReviewAction::Skip {
            field: "Missing".into(),
        },
        ReviewAction::Approve {
            field: "Rep".into(),
        },
    ];
    assert!(apply_all(&mut state, &actions).is_err());
    assert_eq!(state.status("Rep"), RowStatus::Pending);
}

#[test]
fn out_of_range_confidence_rejected_at_load() {
    let response = AiFieldMappingResponse {
        mappings: vec![mapping("Rep", "Agent", 1.4, None)],
        learned_format_used: false,
        overall_confidence: 0.0,
    };
    let err = MappingState::load(response, vec![], &ReviewConfig::default()).unwrap_err();
    assert_eq!(err.field(), Some("Rep"));
}

fn decode(confidence: &str) -> stmt_map::Result<MappingState> {
    let json = format!(
        r#"{{
            "mappings": [{{"extracted_field": "Rep", "mapped_to": "Agent", "confidence": {confidence}}}],
            "learned_format_used": true,
            "overall_confidence": 0.9
        }}"#
    );
    let response = AiFieldMappingResponse::from_json(&json).unwrap();
    MappingState::load(response, database_fields(), &ReviewConfig::default())
}

#[test]
fn score_just_below_threshold_stays_pending() {
    let state = decode("0.89999999").unwrap();
    assert_eq!(state.status("Rep"), RowStatus::Pending);
    assert!(!state.is_auto_approved("Rep"));

    let state = decode("0.9").unwrap();
    assert_eq!(state.status("Rep"), RowStatus::Approved);
}

#[test]
fn score_just_above_one_is_rejected() {
    let err = decode("1.00000001").unwrap_err();
    assert!(matches!(err, MappingError::InvalidConfidence { .. }));
    assert_eq!(err.field(), Some("Rep"));
}
