//! Field-mapping review for extracted commission statements.
//!
//! When a statement table is extracted, the backend suggests which database
//! field each extracted column should map to. This crate holds the review of
//! those suggestions:
//!
//! - **State** (`state`): row approvals, renames and dropdown overrides for
//!   one mapping batch, with auto-approval of trusted rows at load time
//! - **Reconciliation** (`reconcile`): the pure merge of those layers into the
//!   final `extracted_field -> target field` mapping
//! - **Gate** (`gate`): whether the review may be submitted
//!
//! Nothing here performs I/O; fetching batches and posting the result belong
//! to the caller.
//!
//! # Example
//!
//! ```ignore
//! use stmt_map::{AiFieldMappingResponse, MappingState, ReviewConfig};
//!
//! let mut state = MappingState::load(response, database_fields, &ReviewConfig::default())?;
//! state.approve("Plan")?;
//! let snapshot = state.set_database_field_selection("Plan", "coverage_type")?;
//! assert_eq!(snapshot.field_mapping["Plan"], "Coverage Type");
//!
//! let payload = state.submission()?;
//! ```

mod action;
mod config;
mod error;
mod gate;
mod reconcile;
mod snapshot;
mod state;
mod types;

pub use action::{ReviewAction, apply_all};
pub use config::{
    ConfidenceLevel, ConfidenceThresholds, DEFAULT_AUTO_APPROVE_THRESHOLD, ReviewConfig,
};
pub use error::{MappingError, Result};
pub use gate::ValidationGate;
pub use reconcile::{effective_name, find_duplicate_fields, reconcile, statement_field_labels};
pub use snapshot::{MappingSnapshot, SubmissionPayload};
pub use state::{MappingState, MappingSummary};
pub use types::{AiFieldMappingResponse, DatabaseField, FieldMapping, RowStatus};
