// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)   --> GixBackend  (pure Rust gix)
//! GitClone (fetch)  --> Git2Backend (libgit2 + libssh2)
//!
//! Git2Backend::clone_branch
//!   RemoteCallbacks
//!     credentials        --> SshAuth::credentials
//!     certificate_check  --> HostKeyVerifier::verify   (ssh only)
//!     sideband/transfer  --> CloneProgress, cancellation
//!   CheckoutBuilder      --> CloneProgress::checkout
//!   RepoBuilder          --> branch, depth, single-branch refspec
//! ```
//!
//! gix cannot take a private key from memory, so the clone itself runs on
//! libgit2 while every read-only query stays on gix.

use bon::Builder;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{CertificateCheckStatus, ErrorClass, ErrorCode, FetchOptions, RemoteCallbacks};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::{GitError, GixError, MercatorResult, cancelled_engine_error};
use crate::git::auth::SshAuth;
use crate::git::known_hosts::HostKeyVerifier;
use crate::git::progress::{CloneProgress, TransferStats};
use crate::git::refs::{BranchRef, DEFAULT_REMOTE};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors inspect repository state without modification.
pub trait GitQuery {
    /// Check if `path` itself is a repository (work tree or bare).
    ///
    /// Parent directories are not searched.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or HEAD cannot be read.
    fn current_branch(path: &Path) -> MercatorResult<Option<String>>;

    /// Get the commit HEAD points at (None on an unborn branch).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or HEAD cannot be resolved.
    fn head_commit(path: &Path) -> MercatorResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or status fails.
    fn has_uncommitted_changes(path: &Path) -> MercatorResult<bool>;
}

// --- Clone Trait ---

/// Parameters of one engine clone.
#[derive(Debug, Clone, Copy, Builder)]
pub struct CloneRequest<'a> {
    pub url: &'a str,
    pub branch: &'a BranchRef,
    pub destination: &'a Path,
    /// Shallow clone depth; `None` fetches full history.
    #[builder(setters(name = with_depth))]
    pub depth: Option<u32>,
    /// Fetch only the requested branch.
    #[builder(setters(name = with_single_branch), default = false)]
    pub single_branch: bool,
    #[builder(setters(name = with_cancel))]
    pub cancel: Option<&'a CancellationToken>,
}

impl CloneRequest<'_> {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_cancelled)
    }
}

/// Network clone into an empty directory.
pub trait GitClone {
    /// Clone `request.branch` of `request.url` into `request.destination`.
    ///
    /// # Errors
    ///
    /// Returns the engine error unchanged. Cancellation is reported as an
    /// `ErrorCode::User` error.
    fn clone_branch(
        request: &CloneRequest<'_>,
        auth: &SshAuth,
        verifier: &HostKeyVerifier,
        progress: &mut dyn CloneProgress,
    ) -> Result<(), git2::Error>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only, no subprocess.
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> Result<gix::Repository, GitError> {
        gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))
    }
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::open(path).is_ok()
    }

    fn current_branch(path: &Path) -> MercatorResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn head_commit(path: &Path) -> MercatorResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo.head().map_err(|e| GitError::Gix(GixError::Head(e)))?;
        if head.is_unborn() {
            return Ok(None);
        }
        let id = repo
            .head_id()
            .map_err(|e| GitError::Gix(GixError::HeadId(Box::new(e))))?;
        Ok(Some(id.to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> MercatorResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = Self::open(path)?;
        let status_failed = |message: &str| GitError::StatusFailed {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| status_failed("failed to prepare status check"))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| status_failed("failed to check repository status"))?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- Git2Backend Implementation (libgit2) ---

/// Clone backend using libgit2.
///
/// Required for:
/// - SSH keys held in memory
/// - Host key verification against an explicit `known_hosts`
pub struct Git2Backend;

impl Git2Backend {
    /// Bound how long libgit2 waits to connect and for each network read.
    ///
    /// No callback runs while the engine waits on a socket, so these bound
    /// how long a silent server can stall a clone.
    ///
    /// # Safety
    ///
    /// Writes libgit2 process globals without synchronization. Call before
    /// any thread starts using libgit2.
    ///
    /// # Errors
    ///
    /// Returns the engine error if libgit2 rejects a value.
    pub unsafe fn set_network_timeouts(
        connect: Duration,
        read: Duration,
    ) -> Result<(), git2::Error> {
        let millis = |d: Duration| i32::try_from(d.as_millis()).unwrap_or(i32::MAX);
        // SAFETY: forwarded to the caller's contract above
        unsafe {
            git2::opts::set_server_connect_timeout_in_milliseconds(millis(connect))?;
            git2::opts::set_server_timeout_in_milliseconds(millis(read))?;
        }
        debug!(?connect, ?read, "network timeouts set");
        Ok(())
    }
}

impl GitClone for Git2Backend {
    fn clone_branch(
        request: &CloneRequest<'_>,
        auth: &SshAuth,
        verifier: &HostKeyVerifier,
        progress: &mut dyn CloneProgress,
    ) -> Result<(), git2::Error> {
        if request.is_cancelled() {
            return Err(cancelled_engine_error());
        }
        // git2 panics on interior NUL; such a branch can never exist
        if request.branch.short().contains('\0') {
            return Err(git2::Error::new(
                ErrorCode::InvalidSpec,
                ErrorClass::Reference,
                format!("the given reference name '{}' is not valid", request.branch),
            ));
        }

        let progress = RefCell::new(progress);
        let attempts = Cell::new(0_usize);

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|url, username_from_url, allowed| {
            if request.is_cancelled() {
                return Err(cancelled_engine_error());
            }
            attempts.set(attempts.get() + 1);
            trace!(url, ?username_from_url, ?allowed, "credential request");
            auth.credentials(attempts.get(), allowed)
        });
        callbacks.certificate_check(|cert, host| {
            if request.is_cancelled() {
                return Err(cancelled_engine_error());
            }
            let Some(hostkey) = cert.as_hostkey() else {
                // TLS: keep libgit2's own validation
                return Ok(CertificateCheckStatus::CertificatePassthrough);
            };
            match verifier.verify(host, hostkey.hostkey()) {
                Ok(()) => Ok(CertificateCheckStatus::CertificateOk),
                Err(e) => {
                    warn!(host, error = %e, "rejecting ssh host key");
                    Err(git2::Error::new(
                        ErrorCode::Certificate,
                        ErrorClass::Ssh,
                        e.to_string(),
                    ))
                }
            }
        });
        callbacks.sideband_progress(|data| {
            progress.borrow_mut().remote_message(data);
            !request.is_cancelled()
        });
        callbacks.transfer_progress(|stats| {
            progress.borrow_mut().transfer(&TransferStats::from(&stats));
            !request.is_cancelled()
        });

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);
        if let Some(depth) = request.depth {
            fetch.depth(i32::try_from(depth).unwrap_or(i32::MAX));
        }

        let mut checkout = CheckoutBuilder::new();
        checkout.progress(|path, completed, total| {
            progress.borrow_mut().checkout(path, completed, total);
        });

        let mut builder = RepoBuilder::new();
        builder
            .branch(request.branch.short())
            .fetch_options(fetch)
            .with_checkout(checkout);
        if request.single_branch && request.branch.is_valid() {
            let refspec = request.branch.refspec(DEFAULT_REMOTE);
            debug!(%refspec, "restricting fetch to one branch");
            builder.remote_create(move |repo, name, url| {
                repo.remote_with_fetch(name, url, &refspec)
            });
        }

        let result = builder.clone(request.url, request.destination);
        progress.borrow_mut().finish();

        match result {
            Ok(_) => Ok(()),
            Err(_) if request.is_cancelled() => Err(cancelled_engine_error()),
            Err(e) => Err(e),
        }
    }
}
