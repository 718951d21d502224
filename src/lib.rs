pub mod cancel;
pub mod cli;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod history;
pub mod logging;
pub mod output;
pub mod plan;
pub mod progress;
pub mod prompt;
pub mod rewrite;
pub mod rollback;
pub mod spinner;
pub mod validator;

pub use cancel::CancellationToken;
pub use collector::{collect_files, CollectError, ExclusionSet, PathEntry};
pub use engine::{
    apply_plan, prepare_plan, run_batch, BatchError, BatchOutcome, ExecutionAborted, PreparedPlan,
    RenameRequest,
};
pub use error::{AppError, ExitCode};
pub use executor::{execute_plan, ExecuteError, ExecutionFailure, NoProgress, ProgressEvent, ProgressSink};
pub use plan::{build_plan, ExecutionLedger, RenameOperation, RenamePlan};
pub use rewrite::{FilenameRewriter, RegexRewriter};
pub use rollback::{rollback, RollbackError, RollbackInconsistency, RollbackReport};
pub use validator::{
    validate_exclusions, validate_plan, PlanWarning, TargetConflict, ValidationError,
    ValidationReport,
};
