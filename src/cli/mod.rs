// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for mercator-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! mercator [global options] <command>
//! clone <URL> <DEST> [options]
//! options
//! inis
//! version
//! ```

pub mod clone;
pub mod global;


use crate::cli::clone::CloneArgs;
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Project source cloner
///
/// Fetches one branch of a git repository over HTTPS or SSH.
#[derive(Debug, Parser)]
#[command(
    name = "mercator",
    author,
    version,
    about = "Project source cloner",
    long_about = "mercator-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones one branch of a git repository into a project directory.\n\n\
                  Invoking `mercator clone <url> <dir> -b <branch>` fetches the branch\n\
                  over HTTPS, SSH or a local path. SSH remotes authenticate with the\n\
                  private key given by --key and are checked against known_hosts.\n\
                  See `mercator <command> --help` for more information about a command.",
    after_help = "INI FILES:\n\n\
                  By default, mercator loads `mercator.toml` from the current\n\
                  directory if it exists. Additional files can be specified with\n\
                  --ini, those are loaded after it. MERCATOR_<SECTION>__<KEY>\n\
                  environment variables override files, and --set overrides\n\
                  everything. Use --no-default-inis to only use --ini."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the INIs.
    Options,

    /// Lists the INIs used by mercator.
    Inis,

    /// Clones a branch of a repository.
    Clone(CloneArgs),
}

impl Cli {
    /// All configuration overrides from global and command options, in
    /// increasing priority.
    #[must_use]
    pub fn config_overrides(&self) -> Vec<String> {
        let mut overrides = self.global.to_config_overrides();
        if let Some(Command::Clone(args)) = &self.command {
            overrides.extend(args.to_config_overrides());
        }
        overrides
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
