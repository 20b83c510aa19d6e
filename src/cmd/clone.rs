// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command implementation for mercator-rs.
//!
//! ```text
//! Config ──► Source + CloneOptions ──► clone thread (Source::clone)
//!                                         │ oneshot
//!              select! { result | Ctrl+C token | --timeout }
//!
//! Ok  ──► --verify report (text | json), --list-files
//! Err ──► "clone failed (<kind>): <message>"
//! ```

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::clone::CloneArgs;
use crate::config::Config;
use crate::error::{CloneError, CloneErrorKind, Result};
use crate::git::known_hosts::HostKeyPolicy;
use crate::git::{CloneOptions, CloneReport, Source, inspect_clone};
use crate::utility::fs::walk::{WalkOptions, list_tree};

/// Main handler for clone command.
///
/// # Errors
///
/// Returns an error if the key file cannot be read, the clone fails, or the
/// post-clone report cannot be produced.
pub async fn run_clone_command(args: &CloneArgs, config: &Config) -> Result<()> {
    let pem_bytes = read_key(config.ssh.key_file.as_deref())?;
    let source = build_source(config, home_dir());

    let cancel = CancellationToken::new();
    let options = CloneOptions::builder()
        .maybe_with_pem_bytes(pem_bytes)
        .maybe_with_pem_password(args.passphrase.as_ref().map(|p| p.expose().to_string()))
        .maybe_with_depth(config.clone.depth)
        .with_single_branch(config.clone.single_branch)
        .with_cancel(cancel.clone())
        .build();

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, cancelling clone...");
                cancel.cancel();
            }
        })
    };

    let url = args.url.clone();
    let branch = config.clone.branch.clone();
    let destination = args.destination.clone();
    let result = await_clone(
        move || source.clone(&url, &branch, &destination, &options),
        &cancel,
        args.timeout.map(Duration::from_secs),
    )
    .await;
    interrupt.abort();
    result?;

    if config.clone.verify {
        let report = inspect_clone(&args.destination)
            .with_context(|| format!("failed to inspect {}", args.destination.display()))?;
        print_report(&report, args.json)?;
    }

    if args.list_files {
        for entry in list_tree(&args.destination, &WalkOptions::for_working_tree())? {
            println!("{}", entry.display());
        }
    }

    info!(destination = %args.destination.display(), "done");
    Ok(())
}

/// Run `clone` on its own thread and wait for it, the token or the timeout.
///
/// A cancelled or timed out clone is abandoned: the engine only notices the
/// token between callbacks, so its thread may linger until the remote or the
/// configured network timeouts release it.
pub(crate) async fn await_clone<F>(
    clone: F,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<()>
where
    F: FnOnce() -> std::result::Result<(), CloneError> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("mercator-clone".to_string())
        .spawn(move || {
            // receiver is gone once the clone was abandoned
            let _ = tx.send(clone());
        })
        .context("failed to start clone thread")?;

    let deadline = async {
        match timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending().await,
        }
    };

    let result = tokio::select! {
        biased;
        result = rx => result.context("clone task failed")?,
        () = cancel.cancelled() => Err(CloneError::cancelled()),
        () = deadline => {
            let secs = timeout.unwrap_or_default().as_secs();
            warn!(seconds = secs, "clone timed out, cancelling...");
            cancel.cancel();
            let kind = CloneErrorKind::Cancelled;
            return Err(anyhow::Error::new(CloneError::cancelled())
                .context(format!("clone failed ({kind}): timed out after {secs}s")));
        }
    };

    result.map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("clone failed ({kind})"))
    })
}

/// Build the cloner from the `[ssh]` and `[clone]` sections.
///
/// `known_hosts` falls back to `<home>/.ssh/known_hosts` when unset.
pub(crate) fn build_source(config: &Config, home: Option<PathBuf>) -> Source {
    let known_hosts = config
        .ssh
        .known_hosts
        .clone()
        .or_else(|| home.map(|home| home.join(".ssh").join("known_hosts")));
    debug!(
        known_hosts = ?known_hosts,
        checking = %config.ssh.strict_host_key_checking,
        "host key policy"
    );

    Source::builder()
        .with_ssh_user(config.ssh.user.clone())
        .with_host_keys(
            HostKeyPolicy::builder()
                .maybe_with_known_hosts(known_hosts)
                .with_checking(config.ssh.strict_host_key_checking)
                .build(),
        )
        .with_progress(config.clone.progress)
        .build()
}

/// Read the private key named by `ssh.key_file`.
pub(crate) fn read_key(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    path.map(|path| {
        std::fs::read(path).with_context(|| format!("failed to read key file {}", path.display()))
    })
    .transpose()
}

/// Render the post-clone report.
pub(crate) fn format_report(report: &CloneReport, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("failed to serialize report");
    }

    Ok([
        format!("path   = {}", report.path.display()),
        format!("branch = {}", report.branch.as_deref().unwrap_or("(detached)")),
        format!("head   = {}", report.head.as_deref().unwrap_or("(unborn)")),
        format!("clean  = {}", report.clean),
    ]
    .join("\n"))
}

fn print_report(report: &CloneReport, json: bool) -> Result<()> {
    println!("{}", format_report(report, json)?);
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
