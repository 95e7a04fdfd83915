//! Session saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{PersistenceError, Result};
use crate::session::ReviewSession;

/// Save a review session to a JSON file.
///
/// Uses atomic write (temp file + rename) to prevent data corruption
/// on crash or power loss.
pub fn save_session(session: &mut ReviewSession, path: &Path) -> Result<()> {
    session.touch();

    let bytes = serde_json::to_vec_pretty(session)
        .map_err(|source| PersistenceError::Serialization { source })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        fields = session.state.mappings().len(),
        "Saved review session to {}",
        path.display()
    );
    Ok(())
}
