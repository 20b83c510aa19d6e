// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Options for directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = true)]
    include_hidden: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    /// Returns the maximum depth to traverse.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Returns whether to follow symbolic links.
    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    /// Returns whether to include hidden files/directories.
    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Returns the skip directories list.
    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for listing a checked-out working tree.
    ///
    /// Dotfiles are part of the tree; the `.git` metadata directory is not.
    /// No ignore files are consulted.
    #[must_use]
    pub fn for_working_tree() -> Self {
        Self::builder()
            .with_include_hidden(true)
            .with_skip_dirs(vec![".git".to_string()])
            .build()
    }
}

/// Builds a `WalkBuilder` with the given options, using `filter_entry` for directory skipping.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.standard_filters(false);
    builder.max_depth(options.max_depth());
    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir())
                && let Some(name) = entry.file_name().to_str()
                && skip_dirs.iter().any(|skip| skip == name)
            {
                return false;
            }
            true
        });
    }

    builder
}

/// Lists every file and directory below `root`, relative to it and sorted.
///
/// The root itself is not part of the result. Unreadable entries are logged
/// and skipped.
///
/// # Errors
///
/// Returns an error if `root` does not exist.
///
/// # Example
/// ```no_run
/// use mercator_rs::utility::fs::walk::{list_tree, WalkOptions};
///
/// let entries = list_tree("/path/to/project", &WalkOptions::for_working_tree())?;
/// println!("{} entries", entries.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn list_tree<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let mut entries = Vec::new();
    for entry in build_walker(root, options).build() {
        match entry {
            Ok(entry) if entry.depth() == 0 => {}
            Ok(entry) => {
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    entries.push(relative.to_path_buf());
                }
            }
            Err(e) => warn!(error = %e, "walk error"),
        }
    }

    entries.sort();
    Ok(entries)
}
