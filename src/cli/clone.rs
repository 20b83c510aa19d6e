// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command arguments.
//!
//! ```text
//! mercator clone <URL> <DEST>
//!   -b NAME             clone/branch
//!   -k FILE             ssh/key_file
//!   --known-hosts FILE  ssh/known_hosts          (env SSH_KNOWN_HOSTS)
//!   --no-host-key-check ssh/strict_host_key_checking=no
//!   --depth N           clone/depth
//!   --single-branch     clone/single_branch
//!   --progress MODE     clone/progress
//!   --verify            clone/verify
//!   --passphrase P      (env MERCATOR_KEY_PASSPHRASE, never stored in config)
//! ```

use clap::Args;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::git::known_hosts::KNOWN_HOSTS_ENV;
use crate::git::progress::ProgressDisplay;

/// Private key passphrase. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Passphrase {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[hidden]")
    }
}

/// Arguments of `mercator clone`.
#[derive(Debug, Clone, Args)]
pub struct CloneArgs {
    /// Repository URL (https://, ssh://, git@host:path, file://).
    #[arg(value_name = "URL")]
    pub url: String,

    /// Project directory, created if missing.
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Branch to clone (default from clone/branch, usually 'main').
    #[arg(short = 'b', long = "branch", value_name = "NAME")]
    pub branch: Option<String>,

    /// PEM private key for SSH remotes.
    #[arg(short = 'k', long = "key", value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Passphrase of an encrypted private key.
    #[arg(long, env = "MERCATOR_KEY_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<Passphrase>,

    /// known_hosts file used to verify SSH host keys.
    #[arg(long = "known-hosts", value_name = "FILE", env = KNOWN_HOSTS_ENV)]
    pub known_hosts: Option<PathBuf>,

    /// Accept any SSH host key.
    #[arg(long = "no-host-key-check")]
    pub no_host_key_check: bool,

    /// Shallow clone with this many commits.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: Option<u32>,

    /// Fetch only the requested branch.
    #[arg(long = "single-branch")]
    pub single_branch: bool,

    /// Progress display.
    #[arg(long, value_enum, value_name = "MODE")]
    pub progress: Option<ProgressDisplay>,

    /// Abort the clone after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print branch, HEAD and working tree state after cloning.
    #[arg(long)]
    pub verify: bool,

    /// Print the --verify report as JSON.
    #[arg(long, requires = "verify")]
    pub json: bool,

    /// List the checked-out files after cloning.
    #[arg(long = "list-files")]
    pub list_files: bool,
}

impl CloneArgs {
    /// Converts clone options to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();

        if let Some(ref branch) = self.branch {
            overrides.push(format!("clone/branch={branch}"));
        }
        if let Some(depth) = self.depth {
            overrides.push(format!("clone/depth={depth}"));
        }
        if self.single_branch {
            overrides.push("clone/single_branch=true".to_string());
        }
        if let Some(progress) = self.progress {
            overrides.push(format!("clone/progress={progress}"));
        }
        if self.verify {
            overrides.push("clone/verify=true".to_string());
        }
        if let Some(ref key) = self.key_file {
            overrides.push(format!("ssh/key_file={}", key.display()));
        }
        if let Some(ref known_hosts) = self.known_hosts {
            overrides.push(format!("ssh/known_hosts={}", known_hosts.display()));
        }
        if self.no_host_key_check {
            overrides.push("ssh/strict_host_key_checking=no".to_string());
        }

        overrides
    }
}
