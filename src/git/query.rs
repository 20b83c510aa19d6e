// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix backend.
//!
//! ```text
//! query.rs --> GixBackend --> .git/ (no subprocess)
//! ```

use crate::error::MercatorResult;
use std::path::Path;

use super::backend::{GitQuery, GixBackend};

/// Check if `path` itself holds a repository. Parents are not searched.
#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or HEAD cannot be read.
pub fn current_branch(path: &Path) -> MercatorResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Get the commit id HEAD points at (None on an unborn branch).
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or HEAD cannot be resolved.
pub fn head_commit(path: &Path) -> MercatorResult<Option<String>> {
    GixBackend::head_commit(path)
}

/// Check for uncommitted changes (staged, unstaged, or untracked files).
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or status fails.
pub fn has_uncommitted_changes(path: &Path) -> MercatorResult<bool> {
    GixBackend::has_uncommitted_changes(path)
}
