mod types;

pub use types::*;

use crate::collector::ExclusionSet;
use crate::plan::RenamePlan;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Check that every exclusion is an existing directory and canonicalize it.
///
/// Runs before collection starts so no walk is wasted on a bad exclusion.
pub fn validate_exclusions(paths: &[PathBuf]) -> Result<ExclusionSet, ValidationError> {
    let mut dirs = Vec::with_capacity(paths.len());

    for path in paths {
        let canonical = match fs::canonicalize(path) {
            Ok(p) if p.is_dir() => p,
            _ => {
                warn!(path = ?path, "Invalid exclusion");
                return Err(ValidationError::InvalidExclusion { path: path.clone() });
            }
        };

        debug!(path = ?canonical, "Exclusion accepted");
        if !dirs.contains(&canonical) {
            dirs.push(canonical);
        }
    }

    Ok(ExclusionSet::new(dirs))
}

/// Reject plans whose outcome would be ambiguous, and flag existing targets.
///
/// Read-only: nothing on disk is touched.
pub fn validate_plan(plan: &RenamePlan) -> Result<ValidationReport, ValidationError> {
    info!("Validating {} planned renames", plan.len());

    for op in plan.iter() {
        if !is_plain_file_name(&op.target_name) {
            warn!(source = ?op.source_path, name = %op.target_name, "Invalid target name");
            return Err(ValidationError::InvalidTargetName {
                source_path: op.source_path.clone(),
                name: op.target_name.clone(),
            });
        }
    }

    let mut by_target: HashMap<&Path, Vec<PathBuf>> = HashMap::new();
    let mut order: Vec<&Path> = Vec::new();
    for op in plan.iter() {
        let sources = by_target.entry(op.target_path.as_path()).or_insert_with(|| {
            order.push(op.target_path.as_path());
            Vec::new()
        });
        sources.push(op.source_path.clone());
    }

    let conflicts: Vec<TargetConflict> = order
        .into_iter()
        .filter_map(|target| {
            let sources = by_target.remove(target)?;
            (sources.len() > 1).then(|| TargetConflict {
                target: target.to_path_buf(),
                sources,
            })
        })
        .collect();

    if !conflicts.is_empty() {
        warn!(count = conflicts.len(), "Target collisions detected");
        return Err(ValidationError::PlanConflict { conflicts });
    }

    let mut report = ValidationReport::default();
    for op in plan.iter() {
        if fs::symlink_metadata(&op.target_path).is_ok() {
            debug!(target = ?op.target_path, "Target already exists");
            report.warnings.push(PlanWarning::TargetExists {
                source: op.source_path.clone(),
                target: op.target_path.clone(),
            });
        }
    }

    info!(warnings = report.warnings.len(), "Validation passed");

    Ok(report)
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) => c == name,
        _ => false,
    }
}
