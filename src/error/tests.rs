// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CloneError, CloneErrorKind, ConfigError, MercatorError, MercatorResult};
use git2::{ErrorClass, ErrorCode};
use std::path::PathBuf;

fn engine(code: ErrorCode, class: ErrorClass, message: &str) -> git2::Error {
    git2::Error::new(code, class, message)
}

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "clone".to_string(),
        key: "depth".to_string(),
        message: "depth must be at least 1".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'depth' in section '[clone]': depth must be at least 1");
}

#[test]
fn test_already_exists_message_is_exact() {
    let err = CloneError::AlreadyExists {
        path: PathBuf::from("/tmp/project"),
    };
    assert_eq!(err.to_string(), "repository already exists");
    assert_eq!(err.kind(), CloneErrorKind::AlreadyExists);
}

#[test]
fn test_engine_message_passed_through() {
    let err = CloneError::from(engine(
        ErrorCode::NotFound,
        ErrorClass::Reference,
        "reference 'refs/remotes/origin/nope' not found",
    ));
    assert_eq!(
        err.to_string(),
        "reference 'refs/remotes/origin/nope' not found"
    );
    assert_eq!(err.kind(), CloneErrorKind::ReferenceNotFound);
}

#[test]
fn test_engine_classification() {
    let cases = vec![
        (
            "callback auth",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::Auth,
                ErrorClass::Callback,
                "authentication required",
            )),
        ),
        (
            "http 401",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::GenericError,
                ErrorClass::Http,
                "unexpected http status code: 401",
            )),
        ),
        (
            "http 404",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::GenericError,
                ErrorClass::Http,
                "unexpected http status code: 404",
            )),
        ),
        (
            "ssh key",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::GenericError,
                ErrorClass::Ssh,
                "Failed to authenticate SSH session: Unable to extract public key from private key file",
            )),
        ),
        (
            "ssh auth",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::GenericError,
                ErrorClass::Ssh,
                "Failed to authenticate SSH session: Callback returned error",
            )),
        ),
        (
            "net",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::GenericError,
                ErrorClass::Net,
                "failed to resolve address for nowhere.invalid",
            )),
        ),
        (
            "host key",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::Certificate,
                ErrorClass::Ssh,
                "host key for 'example.com' is not in known_hosts",
            )),
        ),
        (
            "user",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::User,
                ErrorClass::Callback,
                "transfer cancelled",
            )),
        ),
        (
            "invalid ref",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::InvalidSpec,
                ErrorClass::Reference,
                "the given reference name 'refs/remotes/origin/' is not valid",
            )),
        ),
        (
            "exists",
            CloneErrorKind::from_engine(&engine(
                ErrorCode::Exists,
                ErrorClass::Invalid,
                "'/tmp/x' exists and is not an empty directory",
            )),
        ),
    ];
    insta::assert_yaml_snapshot!(cases, @r#"
    - - callback auth
      - auth_required
    - - http 401
      - auth_required
    - - http 404
      - transport
    - - ssh key
      - key_invalid
    - - ssh auth
      - auth_required
    - - net
      - transport
    - - host key
      - host_key_rejected
    - - user
      - cancelled
    - - invalid ref
      - reference_not_found
    - - exists
      - other
    "#);
}

#[test]
fn test_cancelled_error() {
    let err = CloneError::cancelled();
    assert_eq!(err.kind(), CloneErrorKind::Cancelled);
    assert_eq!(err.to_string(), "clone cancelled");
}

#[test]
fn test_io_error_kind() {
    let err = CloneError::from(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "permission denied",
    ));
    assert_eq!(err.kind(), CloneErrorKind::Io);
    assert_eq!(err.to_string(), "permission denied");
}

#[test]
fn test_mercator_error_size() {
    // All variants are boxed, Box<str> (fat pointer) is the widest payload
    let size = std::mem::size_of::<MercatorError>();
    assert!(size <= 24, "MercatorError is {size} bytes, expected <= 24");
}

#[test]
fn test_mercator_result_size() {
    let size = std::mem::size_of::<MercatorResult<()>>();
    assert!(size <= 24, "MercatorResult<()> is {size} bytes, expected <= 24");
}
