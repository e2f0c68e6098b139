//! Repository root resolution
//!
//! Turns the user-supplied path into an absolute repository root and checks
//! that it looks like a git working tree.

use std::path::{Path, PathBuf};

use crate::core::error::StartupError;

/// Name of the git metadata entry in a working tree (a directory, or a file for worktrees)
pub const GIT_MARKER: &str = ".git";

/// Make a path absolute without requiring it to exist
pub fn absolutize(path: &Path) -> Result<PathBuf, StartupError> {
    std::path::absolute(path).map_err(|source| StartupError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

/// Check whether a directory carries git metadata
pub fn is_git_repo(root: &Path) -> bool {
    root.join(GIT_MARKER).exists()
}

/// Resolve and validate the repository root
pub fn resolve_repo_root(path: &Path) -> Result<PathBuf, StartupError> {
    let absolute = absolutize(path)?;

    if !absolute.is_dir() {
        return Err(StartupError::NotFound(absolute));
    }

    if !is_git_repo(&absolute) {
        return Err(StartupError::NotARepository(absolute));
    }

    Ok(absolute)
}
