//! Terminal output for review commands.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use stmt_map::{
    ConfidenceLevel, ConfidenceThresholds, MappingState, RowStatus, SubmissionPayload,
    ValidationGate,
};

/// Print the review table, counts and gate state.
pub fn print_review(state: &MappingState, thresholds: &ConfidenceThresholds) {
    let summary = state.summary();
    println!(
        "Batch: {} fields, learned format: {}, overall confidence: {:.0}%",
        summary.total,
        if state.learned_format_used() { "yes" } else { "no" },
        state.overall_confidence() * 100.0
    );
    println!("{}", review_table(state, thresholds));
    println!(
        "Approved: {} ({} auto), skipped: {}, pending: {}",
        summary.approved, summary.auto_approved, summary.skipped, summary.pending
    );
    println!("{}", gate_line(&state.gate()));
}

/// Print the payload that submit would send.
pub fn print_submission(payload: &SubmissionPayload) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Extracted field"),
        header_cell("Stored as"),
        header_cell("Database field"),
    ]);
    apply_table_style(&mut table);
    for (field, target) in &payload.field_mapping {
        let label = payload
            .statement_field_labels
            .get(field)
            .map_or(field.as_str(), String::as_str);
        table.add_row(vec![Cell::new(field), Cell::new(label), Cell::new(target)]);
    }
    println!("{table}");
    if !payload.skipped_fields.is_empty() {
        println!("Skipped: {}", payload.skipped_fields.join(", "));
    }
}

/// Build the per-row review table.
pub fn review_table(state: &MappingState, thresholds: &ConfidenceThresholds) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Extracted field"),
        header_cell("Suggested"),
        header_cell("Selected"),
        header_cell("Stored as"),
        header_cell("Confidence"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(4) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for mapping in state.mappings() {
        let field = mapping.extracted_field.as_str();
        let selected = match state.selection(field) {
            Some(db) if db.display_name == mapping.mapped_to => Cell::new(&db.display_name),
            Some(db) => Cell::new(&db.display_name)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        };
        let stored_as = state.effective_name(field);
        let stored_cell = if stored_as == field {
            dim_cell(stored_as)
        } else {
            Cell::new(stored_as).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(field),
            Cell::new(&mapping.mapped_to),
            selected,
            stored_cell,
            confidence_cell(
                mapping.confidence,
                state.confidence_level(field, thresholds),
            ),
            status_cell(state.status(field), state.is_auto_approved(field)),
        ]);
    }
    table
}

/// One-line gate description.
pub fn gate_line(gate: &ValidationGate) -> String {
    if gate.can_submit {
        return "Ready to submit".to_string();
    }
    let mut reasons = Vec::new();
    if !gate.pending_fields.is_empty() {
        reasons.push(format!(
            "{} pending ({})",
            gate.pending_count(),
            gate.pending_fields.join(", ")
        ));
    }
    if !gate.duplicate_fields.is_empty() {
        reasons.push(format!(
            "duplicate names ({})",
            gate.duplicate_fields.join(", ")
        ));
    }
    format!("Not ready: {}", reasons.join("; "))
}

fn confidence_cell(confidence: f64, level: Option<ConfidenceLevel>) -> Cell {
    let percent = format!("{:.0}%", confidence * 100.0);
    let text = match level {
        Some(level) => format!("{percent} {}", level.label()),
        None => format!("{percent} Weak"),
    };
    match level {
        Some(ConfidenceLevel::High) => Cell::new(text).fg(Color::Green),
        Some(ConfidenceLevel::Medium) => Cell::new(text).fg(Color::Yellow),
        Some(ConfidenceLevel::Low) => Cell::new(text).fg(Color::Red),
        None => Cell::new(text)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn status_cell(status: RowStatus, auto: bool) -> Cell {
    match status {
        RowStatus::Approved if auto => Cell::new(format!("{status} (auto)")).fg(Color::Green),
        RowStatus::Approved => Cell::new(status.as_str())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        RowStatus::Skipped => dim_cell(status),
        RowStatus::Pending => Cell::new(status.as_str())
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(15)),
        ]);
    }
}
