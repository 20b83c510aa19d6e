// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bare source repositories for clone tests.
//!
//! Also compiled into the integration tests through `tests/support`.

use git2::build::TreeUpdateBuilder;
use git2::{FileMode, Oid, Repository, Signature, Time};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const MAIN_FILES: &[(&str, &str)] = &[
    (".gitignore", "target/\n"),
    ("README.md", "# demo\n"),
    ("src/lib.rs", "pub fn answer() -> u32 {\n    42\n}\n"),
];

pub(crate) const FEATURE_FILES: &[(&str, &str)] = &[
    ("README.md", "# demo (feature)\n"),
    ("dir2/dirA/dirAA/file4", "4\n"),
    ("docs/guide.md", "guide\n"),
];

/// Listing `list_tree` yields for a checkout of `feature/nested`.
pub(crate) const FEATURE_TREE: &[&str] = &[
    "README.md",
    "dir2",
    "dir2/dirA",
    "dir2/dirA/dirAA",
    "dir2/dirA/dirAA/file4",
    "docs",
    "docs/guide.md",
];

/// Bare repository with `main` (HEAD) and `feature/nested`.
pub(crate) struct SourceRepo {
    _dir: TempDir,
    path: PathBuf,
}

impl SourceRepo {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("source.git");
        let repo = Repository::init_bare(&path).expect("failed to init bare repo");

        let main = commit(&repo, "refs/heads/main", MAIN_FILES, None);
        commit(&repo, "refs/heads/feature/nested", FEATURE_FILES, Some(main));
        repo.set_head("refs/heads/main").expect("failed to set HEAD");

        Self { _dir: dir, path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn url(&self) -> String {
        url::Url::from_file_path(&self.path)
            .expect("absolute path")
            .to_string()
    }
}

/// Commit `files` as the whole tree of `refname`, with a fixed author and time.
pub(crate) fn commit(
    repo: &Repository,
    refname: &str,
    files: &[(&str, &str)],
    parent: Option<Oid>,
) -> Oid {
    let empty = repo
        .treebuilder(None)
        .and_then(|builder| builder.write())
        .expect("failed to write empty tree");
    let empty = repo.find_tree(empty).expect("empty tree");

    let mut update = TreeUpdateBuilder::new();
    for (path, content) in files {
        let blob = repo.blob(content.as_bytes()).expect("failed to write blob");
        update.upsert(*path, blob, FileMode::Blob);
    }
    let tree = update
        .create_updated(repo, &empty)
        .and_then(|oid| repo.find_tree(oid))
        .expect("failed to write tree");

    let signature = Signature::new("Mercator", "mercator@example.com", &Time::new(1_767_225_600, 0))
        .expect("signature");
    let parents = parent
        .map(|oid| repo.find_commit(oid).expect("parent commit"))
        .into_iter()
        .collect::<Vec<_>>();
    let parents = parents.iter().collect::<Vec<_>>();

    repo.commit(Some(refname), &signature, &signature, refname, &tree, &parents)
        .expect("failed to commit")
}
