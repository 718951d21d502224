use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::cancel::CancellationToken;
use crate::plan::{ExecutionLedger, RenameOperation, RenamePlan};

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Target already exists: {target}")]
    TargetExists { source_path: PathBuf, target: PathBuf },

    #[error("Failed to rename '{from}' to '{to}': {source}")]
    Filesystem {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cancelled after {applied} of {total} renames")]
    Cancelled { applied: usize, total: usize },
}

/// Execution stopped early; `ledger` holds what was applied before the error.
#[derive(Debug)]
pub struct ExecutionFailure {
    pub error: ExecuteError,
    pub ledger: ExecutionLedger,
}

/// Emitted after each applied rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub applied: usize,
    pub total: usize,
}

/// Receives progress ticks from the rename loop. Must not block.
pub trait ProgressSink {
    fn tick(&self, event: ProgressEvent);
}

impl ProgressSink for Sender<ProgressEvent> {
    fn tick(&self, event: ProgressEvent) {
        // A receiver that already went away only loses the indicator.
        let _ = self.send(event);
    }
}

/// Sink that drops every event.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&self, _event: ProgressEvent) {}
}

/// Apply `plan` in order, one rename at a time.
///
/// Stops at the first cancellation, existing target, or I/O error and hands
/// back the partial ledger. Nothing is undone here.
pub fn execute_plan(
    plan: &RenamePlan,
    token: &CancellationToken,
    sink: &dyn ProgressSink,
) -> Result<ExecutionLedger, ExecutionFailure> {
    let total = plan.len();
    let mut ledger = ExecutionLedger::new();

    info!("Executing {} renames", total);

    for op in plan.iter() {
        if token.is_cancelled() {
            info!(applied = ledger.len(), "Cancellation requested");
            return Err(ExecutionFailure {
                error: ExecuteError::Cancelled {
                    applied: ledger.len(),
                    total,
                },
                ledger,
            });
        }

        if let Err(error) = apply(op) {
            error!("Rename failed: {}", error);
            return Err(ExecutionFailure { error, ledger });
        }

        ledger.record(op.clone());
        sink.tick(ProgressEvent {
            applied: ledger.len(),
            total,
        });
    }

    info!("Successfully renamed {} files", ledger.len());

    Ok(ledger)
}

fn apply(op: &RenameOperation) -> Result<(), ExecuteError> {
    // symlink_metadata so a dangling link still counts as occupied
    match fs::symlink_metadata(&op.target_path) {
        Ok(_) => {
            return Err(ExecuteError::TargetExists {
                source_path: op.source_path.clone(),
                target: op.target_path.clone(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ExecuteError::Filesystem {
                from: op.source_path.clone(),
                to: op.target_path.clone(),
                source: e,
            })
        }
    }

    debug!("Renaming: {} -> {}", op.source_name, op.target_name);

    fs::rename(&op.source_path, &op.target_path).map_err(|e| ExecuteError::Filesystem {
        from: op.source_path.clone(),
        to: op.target_path.clone(),
        source: e,
    })
}
