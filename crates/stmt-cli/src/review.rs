//! File-based review workflow shared by the CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use stmt_map::{
    AiFieldMappingResponse, DatabaseField, MappingSnapshot, MappingState, MappingSummary,
    ReviewAction, ReviewConfig, SubmissionPayload, ValidationGate, apply_all,
};
use stmt_persistence::{PersistenceError, ReviewSession, load_session, save_session};

/// Machine-readable result of a review command.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub summary: MappingSummary,
    pub gate: ValidationGate,
    pub snapshot: MappingSnapshot,
}

impl ReviewReport {
    pub fn from_state(state: &MappingState) -> Self {
        Self {
            summary: state.summary(),
            gate: state.gate(),
            snapshot: state.snapshot(),
        }
    }
}

/// Load a fresh batch from the AI response and the database field list.
pub fn open_batch(batch: &Path, fields: &Path, config: &ReviewConfig) -> Result<MappingState> {
    let response = AiFieldMappingResponse::from_json(&read_text(batch, "mapping batch")?)
        .with_context(|| format!("mapping batch {}", batch.display()))?;
    let database_fields = DatabaseField::list_from_json(&read_text(fields, "database fields")?)
        .with_context(|| format!("database fields {}", fields.display()))?;
    let state = MappingState::load(response, database_fields, config)
        .with_context(|| format!("load mapping batch {}", batch.display()))?;
    Ok(state)
}

/// Read a JSON list of review decisions.
pub fn read_decisions(path: &Path) -> Result<Vec<ReviewAction>> {
    let actions = ReviewAction::list_from_json(&read_text(path, "decisions")?)
        .with_context(|| format!("decisions file {}", path.display()))?;
    Ok(actions)
}

/// Apply decisions from a file, if one was given.
pub fn apply_decisions(state: &mut MappingState, decisions: Option<&Path>) -> Result<()> {
    let Some(path) = decisions else {
        return Ok(());
    };
    let actions = read_decisions(path)?;
    tracing::info!(count = actions.len(), "Applying decisions from {}", path.display());
    apply_all(state, &actions).with_context(|| format!("apply decisions {}", path.display()))?;
    Ok(())
}

/// Load a saved session.
pub fn open_session(path: &Path) -> Result<ReviewSession> {
    load_session(path).map_err(persistence_error)
}

/// Save a session atomically.
pub fn store_session(session: &mut ReviewSession, path: &Path) -> Result<()> {
    save_session(session, path).map_err(persistence_error)
}

/// Build the submission payload, failing while the gate is closed.
pub fn submission(state: &MappingState) -> Result<SubmissionPayload> {
    Ok(state.submission()?)
}

fn persistence_error(err: PersistenceError) -> anyhow::Error {
    let message = match err.suggestion() {
        Some(hint) => format!("{} ({hint})", err.user_message()),
        None => err.user_message(),
    };
    anyhow::Error::new(err).context(message)
}

fn read_text(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {what} file {}", path.display()))
}
