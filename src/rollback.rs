use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::history::{read_history, HistoryError};
use crate::plan::{ExecutionLedger, RenameOperation};
use crate::progress::Progress;

/// A ledger entry that could not be undone.
#[derive(Error, Debug)]
pub enum RollbackInconsistency {
    #[error("'{target}' no longer exists, cannot restore '{source_path}'")]
    TargetMissing { source_path: PathBuf, target: PathBuf },

    #[error("'{source_path}' exists again, not overwriting it with '{target}'")]
    SourceOccupied { source_path: PathBuf, target: PathBuf },

    #[error("Failed to rename '{target}' back to '{source_path}': {source}")]
    RenameFailed {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything rollback did, in undo order.
#[derive(Debug, Default)]
pub struct RollbackReport {
    /// Ledger entries considered
    pub attempted: usize,
    /// Entries renamed back, last applied first
    pub restored: Vec<RenameOperation>,
    /// Entries that could not be undone
    pub inconsistencies: Vec<RollbackInconsistency>,
}

impl RollbackReport {
    pub fn is_complete(&self) -> bool {
        self.inconsistencies.is_empty()
    }
}

#[derive(Error, Debug)]
#[error(
    "Rollback incomplete: {} of {} renames could not be undone",
    .report.inconsistencies.len(),
    .report.attempted
)]
pub struct RollbackError {
    pub report: RollbackReport,
}

/// Undo every ledger entry, last applied first.
///
/// Best effort: a failed entry is recorded and the walk continues. Returns
/// `Err` carrying the full report if any entry could not be undone.
pub fn rollback(ledger: &ExecutionLedger) -> Result<RollbackReport, RollbackError> {
    info!("Rolling back {} renames", ledger.len());

    let mut report = RollbackReport {
        attempted: ledger.len(),
        ..Default::default()
    };

    for op in ledger.iter_reverse() {
        match undo(op) {
            Ok(()) => {
                debug!("Restored: {} -> {}", op.target_name, op.source_name);
                report.restored.push(op.clone());
            }
            Err(inconsistency) => {
                warn!("{}", inconsistency);
                report.inconsistencies.push(inconsistency);
            }
        }
    }

    if report.is_complete() {
        info!(restored = report.restored.len(), "Rollback complete");
        Ok(report)
    } else {
        error!(
            failed = report.inconsistencies.len(),
            restored = report.restored.len(),
            "Rollback incomplete"
        );
        Err(RollbackError { report })
    }
}

fn undo(op: &RenameOperation) -> Result<(), RollbackInconsistency> {
    if fs::symlink_metadata(&op.target_path).is_err() {
        return Err(RollbackInconsistency::TargetMissing {
            source_path: op.source_path.clone(),
            target: op.target_path.clone(),
        });
    }

    if fs::symlink_metadata(&op.source_path).is_ok() {
        return Err(RollbackInconsistency::SourceOccupied {
            source_path: op.source_path.clone(),
            target: op.target_path.clone(),
        });
    }

    fs::rename(&op.target_path, &op.source_path).map_err(|e| {
        RollbackInconsistency::RenameFailed {
            source_path: op.source_path.clone(),
            target: op.target_path.clone(),
            source: e,
        }
    })
}

#[derive(Debug, Error)]
pub enum RevertError {
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error(transparent)]
    Incomplete(#[from] RollbackError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RevertOptions {
    pub dry_run: bool,
}

/// Result of reverting a recorded batch
#[derive(Debug)]
pub struct RevertResult {
    /// Operations in the order they are undone
    pub operations: Vec<RenameOperation>,
    pub report: Option<RollbackReport>,
    pub original_history: PathBuf,
    pub dry_run: bool,
}

/// Undo the batch recorded in a history file.
pub fn revert_from_history(
    history_path: &Path,
    options: &RevertOptions,
    progress: &mut Progress,
) -> Result<RevertResult, RevertError> {
    info!("Loading history from: {:?}", history_path);

    let history = read_history(history_path)?;
    let ledger = history.to_ledger();

    info!(
        "History contains {} changes from {}",
        ledger.len(),
        history.executed_at
    );

    progress.revert_start(ledger.len(), &history.executed_at.to_rfc3339());

    let operations: Vec<RenameOperation> = ledger.iter_reverse().cloned().collect();

    let report = if options.dry_run {
        None
    } else {
        Some(rollback(&ledger)?)
    };

    let restored = report
        .as_ref()
        .map_or(operations.len(), |r| r.restored.len());
    progress.revert_complete(restored, options.dry_run);

    Ok(RevertResult {
        operations,
        report,
        original_history: history_path.to_path_buf(),
        dry_run: options.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::write_history;
    use tempfile::tempdir;

    fn op(dir: &Path, from: &str, to: &str) -> RenameOperation {
        RenameOperation::new(dir.join(from), to.to_string())
    }

    #[test]
    fn test_rollback_restores_everything() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.test.ts"), "a").unwrap();
        fs::write(dir.path().join("b.test.ts"), "b").unwrap();
        let ledger: ExecutionLedger = vec![
            op(dir.path(), "a.spec.ts", "a.test.ts"),
            op(dir.path(), "b.spec.ts", "b.test.ts"),
        ]
        .into_iter()
        .collect();

        let report = rollback(&ledger).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.attempted, 2);
        assert_eq!(fs::read_to_string(dir.path().join("a.spec.ts")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("b.spec.ts")).unwrap(), "b");
        assert!(!dir.path().join("a.test.ts").exists());
    }

    #[test]
    fn test_rollback_runs_in_reverse_order() {
        // Chain a -> b -> c: only a reverse walk (c -> b, then b -> a) restores "a".
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c"), "payload").unwrap();
        let ledger: ExecutionLedger = vec![op(dir.path(), "a", "b"), op(dir.path(), "b", "c")]
            .into_iter()
            .collect();

        let report = rollback(&ledger).unwrap();

        let order: Vec<_> = report
            .restored
            .iter()
            .map(|op| (op.target_name.as_str(), op.source_name.as_str()))
            .collect();
        assert_eq!(order, vec![("c", "b"), ("b", "a")]);
        assert_eq!(fs::read_to_string(dir.path().join("a")).unwrap(), "payload");
        assert!(!dir.path().join("b").exists());
        assert!(!dir.path().join("c").exists());
    }

    #[test]
    fn test_missing_target_is_recorded_and_rest_continues() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.new"), "").unwrap();
        // b.new was removed out-of-band
        let ledger: ExecutionLedger = vec![
            op(dir.path(), "a.old", "a.new"),
            op(dir.path(), "b.old", "b.new"),
        ]
        .into_iter()
        .collect();

        let err = rollback(&ledger).unwrap_err();

        assert_eq!(err.report.attempted, 2);
        assert_eq!(err.report.restored.len(), 1);
        assert!(matches!(
            err.report.inconsistencies[0],
            RollbackInconsistency::TargetMissing { .. }
        ));
        assert!(dir.path().join("a.old").exists());
    }

    #[test]
    fn test_occupied_source_is_never_overwritten() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.new"), "renamed").unwrap();
        fs::write(dir.path().join("a.old"), "newcomer").unwrap();
        let ledger: ExecutionLedger = vec![op(dir.path(), "a.old", "a.new")].into_iter().collect();

        let err = rollback(&ledger).unwrap_err();

        assert!(matches!(
            err.report.inconsistencies[0],
            RollbackInconsistency::SourceOccupied { .. }
        ));
        assert_eq!(fs::read_to_string(dir.path().join("a.old")).unwrap(), "newcomer");
        assert_eq!(fs::read_to_string(dir.path().join("a.new")).unwrap(), "renamed");
    }

    #[test]
    fn test_empty_ledger() {
        let report = rollback(&ExecutionLedger::new()).unwrap();
        assert_eq!(report.attempted, 0);
        assert!(report.restored.is_empty());
    }

    fn setup_reverted_scenario() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.test.ts"), "").unwrap();
        fs::write(dir.path().join("b.test.ts"), "").unwrap();
        let ledger: ExecutionLedger = vec![
            op(dir.path(), "a.spec.ts", "a.test.ts"),
            op(dir.path(), "b.spec.ts", "b.test.ts"),
        ]
        .into_iter()
        .collect();
        let history_path = write_history(&ledger, dir.path(), "spec", "test").unwrap();
        (dir, history_path)
    }

    #[test]
    fn test_revert_from_history() {
        let (dir, history_path) = setup_reverted_scenario();

        let result = revert_from_history(
            &history_path,
            &RevertOptions { dry_run: false },
            &mut Progress::silent(),
        )
        .unwrap();

        assert_eq!(result.operations.len(), 2);
        assert_eq!(result.operations[0].target_name, "b.test.ts");
        assert!(result.report.unwrap().is_complete());
        assert!(dir.path().join("a.spec.ts").exists());
        assert!(dir.path().join("b.spec.ts").exists());
        assert!(!dir.path().join("a.test.ts").exists());
    }

    #[test]
    fn test_revert_dry_run_changes_nothing() {
        let (dir, history_path) = setup_reverted_scenario();

        let result = revert_from_history(
            &history_path,
            &RevertOptions { dry_run: true },
            &mut Progress::silent(),
        )
        .unwrap();

        assert!(result.dry_run);
        assert!(result.report.is_none());
        assert!(dir.path().join("a.test.ts").exists());
        assert!(!dir.path().join("a.spec.ts").exists());
    }

    #[test]
    fn test_revert_reports_inconsistencies() {
        let (dir, history_path) = setup_reverted_scenario();
        fs::remove_file(dir.path().join("a.test.ts")).unwrap();

        let result = revert_from_history(
            &history_path,
            &RevertOptions::default(),
            &mut Progress::silent(),
        );

        match result {
            Err(RevertError::Incomplete(err)) => {
                assert_eq!(err.report.restored.len(), 1);
                assert_eq!(err.report.inconsistencies.len(), 1);
            }
            other => panic!("expected Incomplete, got {:?}", other),
        }
        assert!(dir.path().join("b.spec.ts").exists());
    }
}
