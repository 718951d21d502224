use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a plan that passed validation.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Advisory findings; execution re-checks each target regardless.
    pub warnings: Vec<PlanWarning>,
}

impl ValidationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    /// The target already exists on disk at validation time.
    TargetExists { source: PathBuf, target: PathBuf },
}

impl PlanWarning {
    pub fn message(&self) -> String {
        match self {
            PlanWarning::TargetExists { source, target } => format!(
                "Target already exists: {} (from {})",
                target.display(),
                source.display()
            ),
        }
    }
}

/// Several plan entries resolving to the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConflict {
    pub target: PathBuf,
    pub sources: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Excluded directory does not exist: {path}")]
    InvalidExclusion { path: PathBuf },

    #[error("Multiple files would be renamed to the same target")]
    PlanConflict { conflicts: Vec<TargetConflict> },

    #[error("Replacement produces an invalid file name '{name}' for {source_path}")]
    InvalidTargetName { source_path: PathBuf, name: String },
}

impl ValidationError {
    pub fn format_error_message(&self) -> String {
        match self {
            ValidationError::InvalidExclusion { path } => format!(
                "Excluded directory does not exist or is not a directory:\n  {}\n",
                path.display()
            ),
            ValidationError::PlanConflict { conflicts } => {
                let mut msg = String::from(
                    "The following files would be renamed to the same target:\n\n",
                );
                for conflict in conflicts {
                    msg.push_str(&format!("  {}\n", conflict.target.display()));
                    for source in &conflict.sources {
                        msg.push_str(&format!("    <- {}\n", source.display()));
                    }
                }
                msg.push_str("\nNo files were renamed.\n");
                msg
            }
            ValidationError::InvalidTargetName { source_path, name } => format!(
                "Replacement turns\n  {}\ninto '{}', which is not a plain file name.\n\
                 Renames must stay within the file's own directory.\n",
                source_path.display(),
                name
            ),
        }
    }
}
