use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// A non-directory entry discovered under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    path: PathBuf,
}

impl PathEntry {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component, if it is valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Directory subtrees that are pruned from the walk.
///
/// Members are absolute, canonical paths; see
/// [`validate_exclusions`](crate::validator::validate_exclusions).
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    dirs: Vec<PathBuf>,
}

impl ExclusionSet {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    /// True if `path` equals a member or lies beneath one.
    ///
    /// `Path::starts_with` compares whole components, so `/a/build` does not
    /// exclude `/a/build-tools`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.dirs.iter().any(|dir| path.starts_with(dir))
    }
}

/// Walk `root` and return every non-directory entry outside `exclusions`.
///
/// The walk is depth-first with entries sorted by name. Excluded directories
/// are never descended into. Any error aborts the whole collection.
pub fn collect_files(root: &Path, exclusions: &ExclusionSet) -> Result<Vec<PathEntry>, CollectError> {
    debug!(path = ?root, "Collecting files");

    if !root.exists() {
        return Err(CollectError::PathNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(CollectError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|e| permission_or_io(root, e))?;
    let root = fs::canonicalize(root).map_err(|e| permission_or_io(root, e))?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() && exclusions.is_excluded(entry.path()) {
                debug!(path = ?entry.path(), "Pruning excluded directory");
                return false;
            }
            true
        });

    let mut entries = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|e| match (e.path(), e.io_error().map(|io| io.kind())) {
            (Some(path), Some(std::io::ErrorKind::PermissionDenied)) => {
                CollectError::PermissionDenied(path.to_path_buf())
            }
            _ => CollectError::Walk(e),
        })?;

        if entry.file_type().is_dir() {
            trace!(path = ?entry.path(), "Entering directory");
            continue;
        }

        trace!(path = ?entry.path(), "Found entry");
        entries.push(PathEntry::new(entry.into_path()));
    }

    debug!(count = entries.len(), "Collection complete");

    Ok(entries)
}

fn permission_or_io(path: &Path, err: std::io::Error) -> CollectError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        CollectError::PermissionDenied(path.to_path_buf())
    } else {
        CollectError::IoError(err)
    }
}
