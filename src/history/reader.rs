use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::types::*;
use super::writer::HistoryError;

/// Load a history file written by [`super::write_history`].
///
/// Beyond parsing, every recorded path must be absolute: revert renames
/// them as-is, regardless of the directory it is launched from.
pub fn read_history(path: &Path) -> Result<HistoryFile, HistoryError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HistoryError::ReadError(format!("No such file: {}", path.display())),
        _ => HistoryError::ReadError(format!("Cannot open file: {}", e)),
    })?;

    let history: HistoryFile = serde_json::from_str(&content)
        .map_err(|e| HistoryError::ReadError(format!("Invalid JSON: {}", e)))?;

    if history.version != HISTORY_VERSION {
        return Err(HistoryError::VersionMismatch {
            expected: HISTORY_VERSION.to_string(),
            found: history.version,
        });
    }

    if let Some(entry) = history
        .changes
        .iter()
        .find(|c| !c.source.is_absolute() || !c.target.is_absolute())
    {
        return Err(HistoryError::ReadError(format!(
            "Entry is not an absolute path: {} -> {}",
            entry.source.display(),
            entry.target.display()
        )));
    }

    debug!(changes = history.changes.len(), "History loaded");
    Ok(history)
}
