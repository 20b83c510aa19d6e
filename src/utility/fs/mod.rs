// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! normalize_path()  "a/./b//c/../d" --> "a/b/d"
//! ensure_dir()      create destination (and parents) if absent
//! walk:  list_tree()   sorted relative entries, skip_dirs
//!        WalkOptions   max_depth, hidden, skip_dirs
//! ```

pub mod walk;

#[cfg(test)]
mod tests;

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Lexically normalize a path.
///
/// Drops `.` segments, collapses repeated separators and folds `..` into the
/// preceding normal segment. `..` never climbs above a root; leading `..` of
/// relative paths are kept. An empty result becomes `.`.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Create `path` and its parents if it does not exist yet.
///
/// Returns `true` when the directory was created by this call.
///
/// # Errors
///
/// Returns the underlying I/O error unchanged if the directory cannot be
/// created, or if `path` exists and is not a directory.
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            std::fs::create_dir_all(path)?;
            debug!(path = %path.display(), "created destination directory");
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
