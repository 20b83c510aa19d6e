// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared helpers for integration tests.

#![allow(dead_code, unreachable_pub)]

use git2::Repository;
use mercator_rs::utility::fs::walk::{WalkOptions, list_tree};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[path = "../../src/git/fixture.rs"]
mod fixture;

use fixture::commit;

pub const TRUNK_FILES: &[(&str, &str)] = &[
    ("Cargo.toml", "[package]\nname = \"demo\"\n"),
    ("src/main.rs", "fn main() {}\n"),
];

pub const RELEASE_FILES: &[(&str, &str)] = &[
    ("Cargo.toml", "[package]\nname = \"demo\"\nversion = \"1.0.0\"\n"),
    ("CHANGELOG.md", "## 1.0.0\n"),
    ("src/main.rs", "fn main() {\n    println!(\"1.0\");\n}\n"),
];

/// Bare repository with `trunk` (HEAD) and `release/1.0` on top of it.
pub struct Remote {
    _dir: TempDir,
    path: PathBuf,
}

impl Remote {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("remote.git");
        let repo = Repository::init_bare(&path).expect("failed to init bare repo");

        let trunk = commit(&repo, "refs/heads/trunk", TRUNK_FILES, None);
        commit(&repo, "refs/heads/release/1.0", RELEASE_FILES, Some(trunk));
        repo.set_head("refs/heads/trunk").expect("failed to set HEAD");

        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        url::Url::from_file_path(&self.path)
            .expect("absolute path")
            .to_string()
    }

    /// Commit id `refs/heads/<branch>` points at.
    pub fn head_of(&self, branch: &str) -> String {
        let repo = Repository::open_bare(&self.path).expect("failed to open remote");
        repo.refname_to_id(&format!("refs/heads/{branch}"))
            .expect("missing branch")
            .to_string()
    }
}

/// Sorted working tree listing with `/` separators, `.git` excluded.
pub fn tree(root: &Path) -> Vec<String> {
    list_tree(root, &WalkOptions::for_working_tree())
        .expect("failed to list tree")
        .into_iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

/// Files of the working tree with their contents.
pub fn contents(root: &Path) -> Vec<(String, Vec<u8>)> {
    tree(root)
        .into_iter()
        .filter(|p| root.join(p).is_file())
        .map(|p| {
            let bytes = std::fs::read(root.join(&p)).expect("failed to read file");
            (p, bytes)
        })
        .collect()
}
