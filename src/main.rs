// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Network timeouts --> Command Dispatch
//!   Clone | Options | Inis | Version
//! ```

use std::process::ExitCode;

use mercator_rs::cli::{self, Cli, Command};
use mercator_rs::cmd::clone::run_clone_command;
use mercator_rs::cmd::config::{run_inis_command, run_options_command};
use mercator_rs::config::{Config, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use mercator_rs::error::Result;
use mercator_rs::git::backend::Git2Backend;
use mercator_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Inis)) {
        return match build_config_loader(&cli) {
            Ok(loader) => {
                run_inis_command(&loader.format_loaded_files());
                ExitCode::SUCCESS
            }
            Err(e) => report_error(&e),
        };
    }

    let config = match build_config_loader(&cli).and_then(ConfigLoader::build) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (connect, read) = config.clone.network_timeouts();
    // SAFETY: no libgit2 work has started yet
    if let Err(e) = unsafe { Git2Backend::set_network_timeouts(connect, read) } {
        eprintln!("Failed to set network timeouts: {e}");
        return ExitCode::FAILURE;
    }

    match dispatch_command(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .with_file_format(config.global.log_format)
        .build()
}

async fn dispatch_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Inis) => Ok(()),
        Some(Command::Clone(args)) => run_clone_command(args, config).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    }
}

fn report_error(e: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {e:#}");
    ExitCode::FAILURE
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(cli: &Cli) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !cli.global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for ini_path in &cli.global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader
        .with_env_prefix(ENV_PREFIX)
        .apply_overrides(&cli.config_overrides())
}
