//! Session loading operations.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{PersistenceError, Result};
use crate::session::{CURRENT_SCHEMA_VERSION, ReviewSession};

/// Load a review session from a JSON file.
pub fn load_session(path: &Path) -> Result<ReviewSession> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_session_bytes(&bytes, path)
}

/// Parse session bytes, checking the schema version before the payload.
fn parse_session_bytes(bytes: &[u8], path: &Path) -> Result<ReviewSession> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
        path: path.to_path_buf(),
        reason: format!("not JSON ({e})"),
    })?;

    let version = value
        .get("schema_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing schema_version".to_string(),
        })?;

    let version = u32::try_from(version).unwrap_or(u32::MAX);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let session: ReviewSession =
        serde_json::from_value(value).map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        fields = session.state.mappings().len(),
        "Loaded review session from {}",
        path.display()
    );
    Ok(session)
}
