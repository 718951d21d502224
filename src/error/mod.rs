mod codes;

pub use codes::ExitCode;

use crate::collector::CollectError;
use crate::engine::BatchError;
use crate::executor::ExecuteError;
use crate::history::HistoryError;
use crate::rollback::{RevertError, RollbackReport};
use crate::validator::{TargetConflict, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Root directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Invalid regex pattern: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid replacement: {message}")]
    InvalidReplacement { replacement: String, message: String },

    #[error("Excluded directory does not exist: {path}")]
    InvalidExclusion { path: PathBuf },

    #[error("Multiple files would be renamed to the same target")]
    PlanConflict { conflicts: Vec<TargetConflict> },

    #[error("Invalid target name '{name}' for {source_path}")]
    InvalidTargetName { source_path: PathBuf, name: String },

    #[error("{cause}")]
    ExecutionAborted {
        cause: ExecuteError,
        rollback: RollbackReport,
    },

    #[error("History file error: {message}")]
    HistoryError {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Revert incomplete")]
    RevertIncomplete { report: RollbackReport },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::InvalidPattern { .. } => ExitCode::InvalidArguments,
            AppError::InvalidReplacement { .. } => ExitCode::InvalidArguments,
            AppError::InvalidExclusion { .. } => ExitCode::InvalidExclusion,
            AppError::PlanConflict { .. } => ExitCode::PlanConflict,
            AppError::InvalidTargetName { .. } => ExitCode::PlanConflict,
            AppError::ExecutionAborted { cause, rollback } => {
                if !rollback.is_complete() {
                    return ExitCode::RollbackIncomplete;
                }
                match cause {
                    ExecuteError::TargetExists { .. } => ExitCode::TargetExists,
                    ExecuteError::Filesystem { source, .. }
                        if source.kind() == std::io::ErrorKind::PermissionDenied =>
                    {
                        ExitCode::PermissionError
                    }
                    ExecuteError::Filesystem { .. } => ExitCode::RenameError,
                    ExecuteError::Cancelled { .. } => ExitCode::Cancelled,
                }
            }
            AppError::HistoryError { .. } => ExitCode::HistoryError,
            AppError::RevertIncomplete { .. } => ExitCode::RollbackIncomplete,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::InvalidPattern { pattern, message } => {
                format!("Invalid regex pattern: {}\n\n{}", pattern, message)
            }

            AppError::InvalidReplacement {
                replacement,
                message,
            } => {
                format!(
                    "Invalid replacement: {}\n\n{}\nNo files were renamed.",
                    replacement, message
                )
            }

            AppError::InvalidExclusion { path } => {
                format!(
                    "Excluded directory does not exist: {}\nAbort",
                    path.display()
                )
            }

            AppError::PlanConflict { conflicts } => ValidationError::PlanConflict {
                conflicts: conflicts.clone(),
            }
            .format_error_message(),

            AppError::InvalidTargetName { source_path, name } => {
                ValidationError::InvalidTargetName {
                    source_path: source_path.clone(),
                    name: name.clone(),
                }
                .format_error_message()
            }

            AppError::ExecutionAborted { cause, rollback } => {
                let mut msg = format!("{}\n\n", cause);
                msg.push_str(&rollback_summary(rollback));
                msg
            }

            AppError::HistoryError { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "History file error:\n  {}\n{}\n\
                     Ensure the history file exists and is valid JSON.",
                    message, path_info
                )
            }

            AppError::RevertIncomplete { report } => rollback_summary(report),

            AppError::Other(message) => message.clone(),
        }
    }
}

fn rollback_summary(report: &RollbackReport) -> String {
    if report.is_complete() {
        return format!(
            "All {} applied renames were rolled back. No files were changed.",
            report.restored.len()
        );
    }

    let mut msg = format!(
        "Rollback incomplete: restored {} of {} renames.\n\
         The following entries need manual attention:\n",
        report.restored.len(),
        report.attempted
    );
    for inconsistency in &report.inconsistencies {
        msg.push_str(&format!("  - {}\n", inconsistency));
    }
    msg
}

impl From<CollectError> for AppError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            CollectError::NotADirectory(path) => AppError::NotADirectory { path },
            CollectError::PermissionDenied(path) => AppError::PermissionDenied { path },
            CollectError::Walk(e) => AppError::Other(format!("Failed to walk directory: {}", e)),
            CollectError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidExclusion { path } => AppError::InvalidExclusion { path },
            ValidationError::PlanConflict { conflicts } => AppError::PlanConflict { conflicts },
            ValidationError::InvalidTargetName { source_path, name } => {
                AppError::InvalidTargetName { source_path, name }
            }
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Collect(e) => e.into(),
            BatchError::Validation(e) => e.into(),
            BatchError::Aborted(aborted) => AppError::ExecutionAborted {
                cause: aborted.error,
                rollback: aborted.rollback,
            },
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        AppError::HistoryError {
            path: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(format!("I/O error: {}", err))
    }
}

impl From<RevertError> for AppError {
    fn from(err: RevertError) -> Self {
        match err {
            RevertError::History(e) => e.into(),
            RevertError::Incomplete(e) => AppError::RevertIncomplete { report: e.report },
        }
    }
}
