// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix()
//!   .set() / .apply_overrides()
//!        |
//!        v
//!    build() --> Config
//! ```
//!
//! Only `<PREFIX>_<SECTION>__<KEY>` variables are configuration. Other
//! variables under the prefix (such as the CLI's own) are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{ConfigError, Result};

const ENV_SEPARATOR: &str = "__";

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Option<HashMap<String, String>>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Read `<PREFIX>_<SECTION>__<KEY>` variables from the process environment.
    #[must_use]
    pub fn with_env_prefix(self, prefix: &str) -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
        self.with_env_vars(prefix, vars)
    }

    /// Like [`Self::with_env_prefix`], over an explicit variable list.
    #[must_use]
    pub fn with_env_vars<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env = Some(env_source(prefix, vars));
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Apply `section/key=value` overrides in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOverride` for entries without a section,
    /// key, or `=`.
    pub fn apply_overrides<S: AsRef<str>>(self, overrides: &[S]) -> Result<Self> {
        overrides.iter().try_fold(self, |loader, entry| {
            let (key, value) = parse_override(entry.as_ref())?;
            loader.set(&key, value)
        })
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - Validation fails.
    pub fn build(self) -> Result<Config> {
        let builder = match self.env {
            Some(vars) => self.builder.add_source(
                config::Environment::default()
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(Some(vars)),
            ),
            None => self.builder,
        };
        let cfg = builder.build()?;
        let mut config: Config = cfg.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip `<prefix>_` and keep `section__key` variables, lowercased.
pub(super) fn env_source<I>(prefix: &str, vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let prefix = format!("{}_", prefix.to_ascii_uppercase());
    vars.into_iter()
        .filter_map(|(name, value)| {
            let key = name.strip_prefix(&prefix)?;
            let (section, field) = key.split_once(ENV_SEPARATOR)?;
            (!section.is_empty() && !field.is_empty())
                .then(|| (key.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Split `section/key=value` into the dotted key and the raw value.
pub(super) fn parse_override(entry: &str) -> std::result::Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidOverride(entry.to_string());
    let (path, value) = entry.split_once('=').ok_or_else(invalid)?;
    let (section, key) = path.trim().split_once('/').ok_or_else(invalid)?;
    if section.is_empty() || key.is_empty() || key.contains('/') {
        return Err(invalid());
    }
    Ok((format!("{section}.{key}"), value.trim().to_string()))
}
