use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::plan::{ExecutionLedger, RenameOperation};

pub const HISTORY_VERSION: &str = "1.0";
pub const HISTORY_FILE_PREFIX: &str = "batch-rename-history-";

/// True for names this tool gives its own history files (including the
/// `.json.tmp` staging name).
pub fn is_history_file_name(name: &str) -> bool {
    name.starts_with(HISTORY_FILE_PREFIX)
        && (name.ends_with(".json") || name.ends_with(".json.tmp"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFile {
    /// Schema version for compatibility
    pub version: String,

    /// When the renames were applied
    pub executed_at: DateTime<Utc>,

    /// Root directory the batch ran against
    pub root: PathBuf,

    /// Match pattern as entered
    pub pattern: String,

    /// Replacement template as entered
    pub replacement: String,

    /// Tool version that created this history
    pub tool_version: String,

    /// Applied renames, in application order
    pub changes: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Path before the rename
    pub source: PathBuf,

    /// Path after the rename
    pub target: PathBuf,
}

impl HistoryFile {
    /// Generate the filename for this history file
    pub fn generate_filename(&self) -> String {
        let timestamp = self.executed_at.format("%Y%m%d-%H%M%S");
        format!("{}{}.json", HISTORY_FILE_PREFIX, timestamp)
    }

    /// Rebuild the ledger this history was written from.
    pub fn to_ledger(&self) -> ExecutionLedger {
        self.changes
            .iter()
            .map(|entry| RenameOperation::from_paths(entry.source.clone(), entry.target.clone()))
            .collect()
    }
}
