mod types;

pub use types::{ExecutionLedger, RenameOperation, RenamePlan};

use crate::collector::PathEntry;
use crate::history::is_history_file_name;
use crate::rewrite::FilenameRewriter;
use tracing::{debug, info, trace, warn};

/// Compute the rename plan for `entries`.
///
/// Only the file-name component is rewritten; the parent directory is kept.
/// History files written by earlier runs are never planned.
/// Order follows `entries` and nothing is deduplicated here: duplicate
/// targets are rejected by [`validate_plan`](crate::validator::validate_plan).
pub fn build_plan(entries: &[PathEntry], rewriter: &dyn FilenameRewriter) -> RenamePlan {
    let mut plan = RenamePlan::new();

    for entry in entries {
        let Some(name) = entry.file_name() else {
            warn!(path = ?entry.path(), "Skipping entry with non UTF-8 file name");
            continue;
        };

        if is_history_file_name(name) {
            debug!(path = ?entry.path(), "Skipping history file");
            continue;
        }

        let Some(new_name) = rewriter.rewrite(name) else {
            trace!(name = %name, "No match");
            continue;
        };

        if new_name == name {
            debug!(name = %name, "Rewrite leaves name unchanged, skipping");
            continue;
        }

        debug!(from = %name, to = %new_name, "Planned rename");
        plan.add_operation(RenameOperation::new(entry.path().to_path_buf(), new_name));
    }

    info!(matched = plan.len(), scanned = entries.len(), "Plan built");

    plan
}
