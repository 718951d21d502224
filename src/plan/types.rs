use std::path::{Path, PathBuf};

/// A single rename operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOperation {
    /// Full path to the file being renamed
    pub source_path: PathBuf,
    /// Original file name
    pub source_name: String,
    /// Full path to the new name, in the same directory
    pub target_path: PathBuf,
    /// New file name
    pub target_name: String,
}

impl RenameOperation {
    pub fn new(source_path: PathBuf, target_name: String) -> Self {
        let source_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let target_path = source_path
            .parent()
            .map(|p| p.join(&target_name))
            .unwrap_or_else(|| PathBuf::from(&target_name));

        Self {
            source_path,
            source_name,
            target_path,
            target_name,
        }
    }

    /// Build an operation from two full paths, e.g. when loading history.
    pub fn from_paths(source_path: PathBuf, target_path: PathBuf) -> Self {
        let name_of = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        };

        Self {
            source_name: name_of(&source_path),
            target_name: name_of(&target_path),
            source_path,
            target_path,
        }
    }
}

/// Ordered rename operations, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub operations: Vec<RenameOperation>,
}

impl RenamePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operation(&mut self, op: RenameOperation) {
        self.operations.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameOperation> {
        self.operations.iter()
    }
}

/// Operations actually applied during one execution, in application order.
///
/// Append-only while executing; consumed in reverse by rollback.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLedger {
    applied: Vec<RenameOperation>,
}

impl ExecutionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, op: RenameOperation) {
        self.applied.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn operations(&self) -> &[RenameOperation] {
        &self.applied
    }

    /// Last applied first.
    pub fn iter_reverse(&self) -> impl Iterator<Item = &RenameOperation> {
        self.applied.iter().rev()
    }
}

impl FromIterator<RenameOperation> for ExecutionLedger {
    fn from_iter<I: IntoIterator<Item = RenameOperation>>(iter: I) -> Self {
        Self {
            applied: iter.into_iter().collect(),
        }
    }
}
