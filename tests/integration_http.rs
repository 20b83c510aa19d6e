// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for HTTP remotes against a mock server.
//!
//! Only the smart-HTTP discovery request is mocked; no packfile is served.

use mercator_rs::error::{CloneError, CloneErrorKind};
use mercator_rs::git::progress::ProgressDisplay;
use mercator_rs::git::{CloneOptions, Source};
use std::path::PathBuf;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DISCOVERY: &str = "/org/repo.git/info/refs";

async fn clone_from(server: &MockServer, dest: PathBuf) -> Result<(), CloneError> {
    clone_branch(server, "org/repo.git", "main", dest).await
}

async fn clone_branch(
    server: &MockServer,
    repo: &str,
    branch: &str,
    dest: PathBuf,
) -> Result<(), CloneError> {
    let url = format!("{}/{repo}", server.uri());
    let branch = branch.to_string();
    tokio::task::spawn_blocking(move || {
        Source::builder()
            .with_progress(ProgressDisplay::Silent)
            .build()
            .clone(&url, &branch, &dest, &CloneOptions::default())
    })
    .await
    .expect("clone task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_remote_is_auth_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DISCOVERY))
        .and(query_param("service", "git-upload-pack"))
        .respond_with(
            ResponseTemplate::new(401).insert_header("WWW-Authenticate", "Basic realm=\"git\""),
        )
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let err = clone_from(&server, temp.path().join("demo")).await.unwrap_err();

    assert_eq!(err.kind(), CloneErrorKind::AuthRequired);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_branch_still_reaches_the_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/org/none.git/info/refs"))
        .respond_with(
            ResponseTemplate::new(401).insert_header("WWW-Authenticate", "Basic realm=\"git\""),
        )
        .expect(1..)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    for branch in ["", "bad..name"] {
        let dest = temp.path().join(format!("demo-{}", branch.len()));
        let err = clone_branch(&server, "org/none.git", branch, dest).await.unwrap_err();
        assert_eq!(err.kind(), CloneErrorKind::AuthRequired, "branch {branch:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_remote_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DISCOVERY))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let err = clone_from(&server, temp.path().join("demo")).await.unwrap_err();

    assert_eq!(err.kind(), CloneErrorKind::Transport);
}

#[tokio::test(flavor = "multi_thread")]
async fn existing_repository_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("demo");
    git2::Repository::init(&dest).unwrap();

    let err = clone_from(&server, dest).await.unwrap_err();
    assert_eq!(err.kind(), CloneErrorKind::AlreadyExists);
}
