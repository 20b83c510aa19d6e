// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for mercator-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   [global]  log levels, log file, log format
//!   [clone]   branch, depth, single_branch, progress, verify, timeouts
//!   [ssh]     user, key_file, known_hosts, strict_host_key_checking
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::git::auth::DEFAULT_SSH_USER;
use crate::git::known_hosts::StrictHostKeyChecking;
use crate::git::progress::ProgressDisplay;
use crate::logging::{LogFormat, LogLevel};

/// Branch cloned when none is given.
pub const DEFAULT_BRANCH: &str = "main";

/// Seconds to wait for the remote to accept a connection.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 30;

/// Seconds a network read may stall before the clone fails.
pub const DEFAULT_IO_TIMEOUT: u64 = 300;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    pub log_file: Option<PathBuf>,
    /// Log file format.
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Clone defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloneConfig {
    /// Branch cloned when `--branch` is not given.
    pub branch: String,
    /// Shallow clone depth. Full history when unset.
    pub depth: Option<u32>,
    /// Fetch only the requested branch.
    pub single_branch: bool,
    /// Progress display.
    pub progress: ProgressDisplay,
    /// Print a report of the cloned repository.
    pub verify: bool,
    /// Seconds to wait for a connection to the remote.
    pub connect_timeout: u64,
    /// Seconds a single network read may stall.
    pub io_timeout: u64,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            depth: None,
            single_branch: false,
            progress: ProgressDisplay::Text,
            verify: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

impl CloneConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == Some(0) {
            return Err(invalid(
                "clone",
                "depth",
                "must be at least 1, leave unset for full history",
            ));
        }
        if self.connect_timeout == 0 {
            return Err(invalid("clone", "connect_timeout", "must be at least 1 second"));
        }
        if self.io_timeout == 0 {
            return Err(invalid("clone", "io_timeout", "must be at least 1 second"));
        }
        Ok(())
    }

    /// Network timeouts handed to the clone engine.
    #[must_use]
    pub const fn network_timeouts(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.connect_timeout),
            Duration::from_secs(self.io_timeout),
        )
    }
}

/// SSH authentication and host key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshConfig {
    /// User presented with the private key.
    pub user: String,
    /// PEM private key file.
    pub key_file: Option<PathBuf>,
    /// `known_hosts` file. Falls back to `~/.ssh/known_hosts`.
    pub known_hosts: Option<PathBuf>,
    /// Reject hosts missing from `known_hosts`.
    pub strict_host_key_checking: StrictHostKeyChecking,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_SSH_USER.to_string(),
            key_file: None,
            known_hosts: None,
            strict_host_key_checking: StrictHostKeyChecking::Yes,
        }
    }
}

impl SshConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.user.trim().is_empty() {
            return Err(invalid("ssh", "user", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
