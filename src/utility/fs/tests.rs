// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::walk::{WalkOptions, list_tree};
use super::{ensure_dir, normalize_path};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_normalize_path() {
    let cases: Vec<(&str, String)> = [
        "a/./b//c/../d",
        "./projects/proj1/",
        "a/b/../../..",
        "/../etc",
        "",
        "../x/./y",
        "/tmp/mercator/projects/proj1/.",
    ]
    .into_iter()
    .map(|input| (input, normalize_path(Path::new(input)).display().to_string()))
    .collect();

    insta::assert_debug_snapshot!(cases, @r#"
    [
        (
            "a/./b//c/../d",
            "a/b/d",
        ),
        (
            "./projects/proj1/",
            "projects/proj1",
        ),
        (
            "a/b/../../..",
            "..",
        ),
        (
            "/../etc",
            "/etc",
        ),
        (
            "",
            ".",
        ),
        (
            "../x/./y",
            "../x/y",
        ),
        (
            "/tmp/mercator/projects/proj1/.",
            "/tmp/mercator/projects/proj1",
        ),
    ]
    "#);
}

#[test]
fn test_ensure_dir_creates_parents() {
    let temp = temp_dir();
    let nested = temp.path().join("projects").join("proj1");

    assert!(ensure_dir(&nested).expect("create"));
    assert!(nested.is_dir());
    assert!(!ensure_dir(&nested).expect("second call"));
}

#[test]
fn test_ensure_dir_rejects_file() {
    let temp = temp_dir();
    let file = temp.path().join("taken");
    std::fs::write(&file, "x").unwrap();

    let err = ensure_dir(&file).expect_err("file is not a directory");
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
}

#[test]
fn test_list_tree_skips_git_dir_keeps_dotfiles() {
    let temp = temp_dir();
    let root = temp.path();
    std::fs::create_dir_all(root.join(".git/objects")).unwrap();
    std::fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    std::fs::create_dir_all(root.join("dir2/dirA/dirAA")).unwrap();
    std::fs::write(root.join("dir2/dirA/dirAA/file4"), "4").unwrap();
    std::fs::write(root.join(".gitignore"), "target\n").unwrap();
    std::fs::write(root.join("README.md"), "# x").unwrap();

    let entries = list_tree(root, &WalkOptions::for_working_tree()).unwrap();
    let expected: Vec<PathBuf> = [
        ".gitignore",
        "README.md",
        "dir2",
        "dir2/dirA",
        "dir2/dirA/dirAA",
        "dir2/dirA/dirAA/file4",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(entries, expected);
}

#[test]
fn test_list_tree_max_depth() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
    std::fs::write(temp.path().join("a/b/c"), "").unwrap();

    let options = WalkOptions::builder().with_max_depth(1).build();
    let entries = list_tree(temp.path(), &options).unwrap();
    assert_eq!(entries, vec![PathBuf::from("a")]);
}

#[test]
fn test_list_tree_missing_root() {
    let temp = temp_dir();
    let result = list_tree(temp.path().join("missing"), &WalkOptions::default());
    assert!(result.is_err());
}
