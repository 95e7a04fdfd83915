//! Persistent storage for statement review sessions.
//!
//! A review can be interrupted and resumed later: the whole
//! [`stmt_map::MappingState`] is written to a JSON session file together with
//! a schema version and timestamps.
//!
//! # File Format
//!
//! ```text
//! {
//!   "schema_version": 1,
//!   "created_at": "2026-10-18T09:12:44+00:00",
//!   "last_saved_at": "2026-10-18T09:30:02+00:00",
//!   "description": "ACME carrier, September statement",
//!   "state": { ... }
//! }
//! ```
//!
//! Writes go to a temp file that is renamed over the target, so a crash
//! never leaves a half-written session behind.

mod error;
mod io;
mod session;

pub use error::{PersistenceError, Result};
pub use io::{load_session, save_session};
pub use session::{CURRENT_SCHEMA_VERSION, ReviewSession};
