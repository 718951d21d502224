use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::plan::ExecutionLedger;

use super::types::*;

/// Error types for history operations
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write history file: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to serialize history: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to read history file: {0}")]
    ReadError(String),

    #[error("History file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Record an applied ledger in `root` so the batch can be reverted later.
pub fn write_history(
    ledger: &ExecutionLedger,
    root: &Path,
    pattern: &str,
    replacement: &str,
) -> Result<PathBuf, HistoryError> {
    let history = create_history(ledger, root, pattern, replacement);
    write_history_file(&history, root)
}

fn create_history(
    ledger: &ExecutionLedger,
    root: &Path,
    pattern: &str,
    replacement: &str,
) -> HistoryFile {
    let changes = ledger
        .operations()
        .iter()
        .map(|op| HistoryEntry {
            source: op.source_path.clone(),
            target: op.target_path.clone(),
        })
        .collect();

    HistoryFile {
        version: HISTORY_VERSION.to_string(),
        executed_at: Utc::now(),
        root: root.to_path_buf(),
        pattern: pattern.to_string(),
        replacement: replacement.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        changes,
    }
}

/// Write `history` into `dir`, never replacing an existing file.
///
/// A second batch in the same second falls back to a millisecond suffix;
/// if that name is taken too the write fails with `AlreadyExists`.
pub fn write_history_file(history: &HistoryFile, dir: &Path) -> Result<PathBuf, HistoryError> {
    let file_path = dir.join(history.generate_filename());

    if !file_path.exists() {
        return write_to_path(history, &file_path);
    }

    warn!("History file already exists: {:?}", file_path);
    let unique_filename = format!(
        "{}{}-{}.json",
        HISTORY_FILE_PREFIX,
        history.executed_at.format("%Y%m%d-%H%M%S"),
        history.executed_at.timestamp_subsec_millis()
    );
    write_to_path(history, &dir.join(unique_filename))
}

fn write_to_path(history: &HistoryFile, path: &Path) -> Result<PathBuf, HistoryError> {
    let temp_path = path.with_extension("json.tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, history)?;
    }

    // rename(2) would silently replace a file created in the meantime
    if fs::symlink_metadata(path).is_ok() {
        let _ = fs::remove_file(&temp_path);
        return Err(HistoryError::WriteError(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        )));
    }

    fs::rename(&temp_path, path)?;

    info!("History written to: {:?}", path);

    Ok(path.to_path_buf())
}
