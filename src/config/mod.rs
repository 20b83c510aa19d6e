// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for mercator-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. mercator.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. MERCATOR_<SECTION>__<KEY> env vars
//! 5. --set section/key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! MERCATOR_CLONE__DEPTH=1            → clone.depth = 1
//! MERCATOR_SSH__KNOWN_HOSTS=/path    → ssh.known_hosts = "/path"
//! MERCATOR_GLOBAL__OUTPUT_LOG_LEVEL=4 → global.output_log_level = 4
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::ConfigLoader;
use types::{CloneConfig, GlobalConfig, SshConfig};

/// File picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "mercator.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "MERCATOR";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Clone defaults.
    pub clone: CloneConfig,
    /// SSH options.
    pub ssh: SshConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mercator_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("mercator.toml")
    ///     .with_env_prefix("MERCATOR")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an empty branch or ssh user,
    /// or a depth of zero.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.clone.branch = self.clone.branch.trim().to_string();
        self.clone.validate()?;
        self.ssh.validate()?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_clone_options(&mut options);
        self.format_ssh_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), fmt_path(self.global.log_file.as_ref()));
        options.insert(
            "global.log_format".into(),
            format!("{:?}", self.global.log_format).to_lowercase(),
        );
    }

    fn format_clone_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("clone.branch".into(), self.clone.branch.clone());
        options.insert(
            "clone.connect_timeout".into(),
            self.clone.connect_timeout.to_string(),
        );
        options.insert("clone.io_timeout".into(), self.clone.io_timeout.to_string());
        options.insert(
            "clone.depth".into(),
            self.clone.depth.map_or_else(String::new, |d| d.to_string()),
        );
        options.insert(
            "clone.single_branch".into(),
            self.clone.single_branch.to_string(),
        );
        options.insert("clone.progress".into(), self.clone.progress.to_string());
        options.insert("clone.verify".into(), self.clone.verify.to_string());
    }

    fn format_ssh_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("ssh.user".into(), self.ssh.user.clone());
        options.insert("ssh.key_file".into(), fmt_path(self.ssh.key_file.as_ref()));
        options.insert(
            "ssh.known_hosts".into(),
            fmt_path(self.ssh.known_hosts.as_ref()),
        );
        options.insert(
            "ssh.strict_host_key_checking".into(),
            self.ssh.strict_host_key_checking.to_string(),
        );
    }
}

fn fmt_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}
