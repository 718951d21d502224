//! Ties the phases together: collect, plan, validate, then either preview or
//! execute with rollback.
//!
//! Every phase returns an explicit `Result`; an execution failure is routed
//! into [`rollback`] here before it reaches the caller.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::cancel::CancellationToken;
use crate::collector::{collect_files, CollectError, ExclusionSet};
use crate::executor::{execute_plan, ExecuteError, ProgressSink};
use crate::plan::{build_plan, ExecutionLedger, RenamePlan};
use crate::rewrite::FilenameRewriter;
use crate::rollback::{rollback, RollbackReport};
use crate::validator::{validate_exclusions, validate_plan, ValidationError, ValidationReport};

/// An execution error together with the outcome of undoing it.
#[derive(Debug)]
pub struct ExecutionAborted {
    pub error: ExecuteError,
    pub rollback: RollbackReport,
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .0.error)]
    Aborted(ExecutionAborted),
}

/// A validated plan ready for preview or execution.
#[derive(Debug)]
pub struct PreparedPlan {
    pub plan: RenamePlan,
    pub report: ValidationReport,
    pub exclusions: ExclusionSet,
}

/// Validate exclusions, walk `root`, build and validate the plan.
///
/// Read-only. Any error here happens before a single rename.
pub fn prepare_plan(
    root: &Path,
    exclusions: &[PathBuf],
    rewriter: &dyn FilenameRewriter,
) -> Result<PreparedPlan, BatchError> {
    let exclusions = validate_exclusions(exclusions)?;
    let entries = collect_files(root, &exclusions)?;
    let plan = build_plan(&entries, rewriter);
    let report = validate_plan(&plan)?;

    for warning in &report.warnings {
        warn!("{}", warning.message());
    }

    Ok(PreparedPlan {
        plan,
        report,
        exclusions,
    })
}

/// Execute `plan`; on any failure roll back what was applied.
pub fn apply_plan(
    plan: &RenamePlan,
    token: &CancellationToken,
    sink: &dyn ProgressSink,
) -> Result<ExecutionLedger, BatchError> {
    match execute_plan(plan, token, sink) {
        Ok(ledger) => Ok(ledger),
        Err(failure) => {
            info!(
                applied = failure.ledger.len(),
                "Execution aborted: {}", failure.error
            );
            let report = match rollback(&failure.ledger) {
                Ok(report) => report,
                Err(incomplete) => incomplete.report,
            };
            Err(BatchError::Aborted(ExecutionAborted {
                error: failure.error,
                rollback: report,
            }))
        }
    }
}

/// Inputs for a single batch run.
pub struct RenameRequest<'a> {
    pub root: PathBuf,
    pub exclusions: Vec<PathBuf>,
    pub rewriter: &'a dyn FilenameRewriter,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// Dry run: the plan that would be executed
    Preview(PreparedPlan),
    /// Every planned rename was applied
    Applied(ExecutionLedger),
}

/// Run a whole batch without user interaction.
///
/// With `dry_run` the executor is never invoked.
pub fn run_batch(
    request: &RenameRequest<'_>,
    token: &CancellationToken,
    sink: &dyn ProgressSink,
) -> Result<BatchOutcome, BatchError> {
    let prepared = prepare_plan(&request.root, &request.exclusions, request.rewriter)?;

    if request.dry_run {
        info!("Dry run, {} renames planned", prepared.plan.len());
        return Ok(BatchOutcome::Preview(prepared));
    }

    apply_plan(&prepared.plan, token, sink).map(BatchOutcome::Applied)
}
