//! Root session file type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stmt_map::MappingState;

/// Current session schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A saved review session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the session was first saved.
    pub created_at: String,

    /// When the session was last saved.
    pub last_saved_at: String,

    /// Optional note, e.g. carrier and statement period.
    #[serde(default)]
    pub description: Option<String>,

    /// Review state at the time of saving.
    pub state: MappingState,
}

impl ReviewSession {
    /// Wrap a review state in a new session.
    pub fn new(state: MappingState) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: now.clone(),
            last_saved_at: now,
            description: None,
            state,
        }
    }

    /// Add a description to this session.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Utc::now().to_rfc3339();
    }

    /// Parse the created_at timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parse the last_saved_at timestamp.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_saved_at)
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
