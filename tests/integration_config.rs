// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use mercator_rs::config::{Config, ConfigLoader};
use mercator_rs::git::known_hosts::StrictHostKeyChecking;
use mercator_rs::git::progress::ProgressDisplay;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.clone.branch, "main");
    assert_eq!(config.clone.depth, None);
    assert_eq!(config.ssh.user, "git");
    assert_eq!(config.ssh.strict_host_key_checking, StrictHostKeyChecking::Yes);
}

#[test]
fn config_parse_clone_section() {
    let toml = r#"
[clone]
branch = "release/2.0"
depth = 1
single_branch = true
progress = "bar"
verify = true
io_timeout = 600
"#;
    let config = Config::parse(toml).unwrap();
    insta::assert_yaml_snapshot!(config.clone, @r#"
    branch: release/2.0
    depth: 1
    single_branch: true
    progress: bar
    verify: true
    connect_timeout: 30
    io_timeout: 600
    "#);
}

#[test]
fn config_parse_ssh_section() {
    let toml = r#"
[ssh]
user = "deploy"
key_file = "/keys/deploy"
known_hosts = "/etc/ssh/ssh_known_hosts"
strict_host_key_checking = "no"
"#;
    let config = Config::parse(toml).unwrap();
    insta::assert_yaml_snapshot!(config.ssh, @r#"
    user: deploy
    key_file: /keys/deploy
    known_hosts: /etc/ssh/ssh_known_hosts
    strict_host_key_checking: "no"
    "#);
}

#[test]
fn config_rejects_invalid_values() {
    for toml in [
        "[clone]\ndepth = 0\n",
        "[clone]\nio_timeout = 0\n",
        "[ssh]\nuser = \"\"\n",
        "[ssh]\nstrict_host_key_checking = \"ask\"\n",
        "[global]\nverbose = true\n",
    ] {
        assert!(Config::parse(toml).is_err(), "{toml:?} should be rejected");
    }
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let temp = tempfile::tempdir().unwrap();
    let base = temp.path().join("mercator.toml");
    let local = temp.path().join("local.toml");
    std::fs::write(&base, "[clone]\nbranch = \"develop\"\nprogress = \"silent\"\n").unwrap();
    std::fs::write(&local, "[clone]\nbranch = \"feature/x\"\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(&base)
        .add_toml_file(&local);
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.clone.branch, "feature/x");
    assert_eq!(config.clone.progress, ProgressDisplay::Silent);
}

#[test]
fn config_missing_required_file() {
    let temp = tempfile::tempdir().unwrap();
    let result = ConfigLoader::new()
        .add_toml_file(temp.path().join("absent.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn config_env_vars_sit_between_files_and_overrides() {
    let config = ConfigLoader::new()
        .add_toml_str("[ssh]\nuser = \"from-file\"\n[clone]\ndepth = 5\n")
        .with_env_vars(
            "MERCATOR",
            [
                ("MERCATOR_SSH__USER".to_string(), "from-env".to_string()),
                ("MERCATOR_CLONE__DEPTH".to_string(), "7".to_string()),
            ],
        )
        .apply_overrides(&["clone/depth=9"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.ssh.user, "from-env");
    assert_eq!(config.clone.depth, Some(9));
}
