// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository cloner.
//!
//! ```text
//! Source::clone(url, branch, destination, options)
//!   1. normalize destination, create it with parents     Io
//!   2. destination already a repository?                 AlreadyExists
//!   3. branch --> refs/heads/<branch>
//!   4. pem bytes? --> SshKey + SshAuth { user: git }     KeyInvalid
//!   5. ssh remote? --> HostKeyPolicy::verifier           Io
//!   6. Git2Backend::clone_branch                         engine kinds
//! ```
//!
//! Steps 1 to 5 never touch the network. Branch names are not checked
//! locally: an unusable name surfaces from the engine as `ReferenceNotFound`,
//! after any authentication or transport failure of the remote. A failed clone may leave a partially
//! populated destination; removing it is up to the caller.

use bon::Builder;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::auth::{DEFAULT_SSH_USER, SshAuth, SshKey};
use super::backend::{CloneRequest, Git2Backend, GitClone};
use super::known_hosts::{HostKeyPolicy, HostKeyVerifier};
use super::progress::{CloneProgress, ProgressDisplay};
use super::query;
use super::refs::BranchRef;
use super::url::RemoteUrl;
use crate::error::{CloneError, MercatorResult};
use crate::utility::fs::{ensure_dir, normalize_path};

/// Credentials and fetch tuning for one clone.
#[derive(Clone, Default, Builder)]
pub struct CloneOptions {
    /// PEM private key. Empty bytes mean no authentication.
    #[builder(setters(name = with_pem_bytes), into)]
    pem_bytes: Option<Vec<u8>>,

    /// Passphrase for an encrypted key.
    #[builder(setters(name = with_pem_password), into)]
    pem_password: Option<String>,

    /// Shallow clone depth.
    #[builder(setters(name = with_depth))]
    depth: Option<u32>,

    /// Fetch only the requested branch.
    #[builder(setters(name = with_single_branch), default = false)]
    single_branch: bool,

    /// Aborts the transfer when cancelled.
    #[builder(setters(name = with_cancel))]
    cancel: Option<CancellationToken>,
}

impl CloneOptions {
    /// Key bytes, if any were supplied and non-empty.
    #[must_use]
    pub fn pem_bytes(&self) -> Option<&[u8]> {
        self.pem_bytes.as_deref().filter(|bytes| !bytes.is_empty())
    }

    #[must_use]
    pub fn pem_password(&self) -> Option<&str> {
        self.pem_password.as_deref()
    }

    #[must_use]
    pub const fn depth(&self) -> Option<u32> {
        self.depth
    }

    #[must_use]
    pub const fn single_branch(&self) -> bool {
        self.single_branch
    }

    #[must_use]
    pub const fn cancel(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }
}

impl fmt::Debug for CloneOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneOptions")
            .field("pem_bytes", &self.pem_bytes().map(|b| format!("[{} bytes]", b.len())))
            .field("pem_password", &self.pem_password.as_ref().map(|_| "[hidden]"))
            .field("depth", &self.depth)
            .field("single_branch", &self.single_branch)
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

/// Clones a branch of a remote repository into a project directory.
///
/// Holds no per-call state; one `Source` serves any number of clones.
#[derive(Debug, Builder)]
pub struct Source {
    /// SSH user presented with a private key.
    #[builder(setters(name = with_ssh_user), into, default = DEFAULT_SSH_USER.to_string())]
    ssh_user: String,

    /// Host key trust for SSH remotes.
    #[builder(setters(name = with_host_keys), default)]
    host_keys: HostKeyPolicy,

    /// Progress output used by [`Source::clone`].
    #[builder(setters(name = with_progress), default)]
    progress: ProgressDisplay,
}

impl Default for Source {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Source {
    /// Source with user `git`, no trusted hosts and text progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ssh_user(&self) -> &str {
        &self.ssh_user
    }

    #[must_use]
    pub const fn host_keys(&self) -> &HostKeyPolicy {
        &self.host_keys
    }

    /// Clone `branch` of `url` into `project_root`, reporting progress with
    /// the configured display.
    ///
    /// # Errors
    ///
    /// Returns a [`CloneError`]; see [`CloneError::kind`] for the
    /// classification.
    pub fn clone(
        &self,
        url: &str,
        branch: &str,
        project_root: impl AsRef<Path>,
        options: &CloneOptions,
    ) -> Result<(), CloneError> {
        let mut sink = self.progress.sink();
        self.clone_with_progress(url, branch, project_root.as_ref(), options, sink.as_mut())
    }

    /// Clone with an explicit progress sink.
    ///
    /// # Errors
    ///
    /// Returns a [`CloneError`]; see [`CloneError::kind`] for the
    /// classification.
    pub fn clone_with_progress(
        &self,
        url: &str,
        branch: &str,
        project_root: &Path,
        options: &CloneOptions,
        progress: &mut dyn CloneProgress,
    ) -> Result<(), CloneError> {
        let remote = RemoteUrl::parse(url);
        let destination = normalize_path(project_root);
        info!(
            url = %remote.redacted(),
            branch,
            destination = %destination.display(),
            "cloning repository"
        );

        if ensure_dir(&destination)? {
            debug!(destination = %destination.display(), "created destination");
        }
        if destination.join(".git").exists() || query::is_git_repo(&destination) {
            warn!(destination = %destination.display(), "destination is already a repository");
            return Err(CloneError::AlreadyExists { path: destination });
        }

        let branch = BranchRef::new(branch);

        let auth = match options.pem_bytes() {
            Some(pem) => {
                let key = SshKey::from_pem(pem, options.pem_password())?;
                debug!(
                    user = %self.ssh_user,
                    format = ?key.format(),
                    encrypted = key.is_encrypted(),
                    "using ssh public key authentication"
                );
                SshAuth::public_key(self.ssh_user.as_str(), key)
            }
            None => {
                debug!("no private key supplied, cloning anonymously");
                SshAuth::anonymous()
            }
        };

        let verifier = if remote.is_ssh() {
            self.host_keys.verifier(remote.port())?
        } else {
            HostKeyVerifier::accept_any()
        };

        let request = CloneRequest::builder()
            .url(url)
            .branch(&branch)
            .destination(&destination)
            .maybe_with_depth(options.depth())
            .with_single_branch(options.single_branch())
            .maybe_with_cancel(options.cancel())
            .build();

        Git2Backend::clone_branch(&request, &auth, &verifier, progress).map_err(|e| {
            let err = CloneError::from(e);
            warn!(kind = %err.kind(), error = %err, "clone failed");
            err
        })?;

        info!(branch = %branch, destination = %destination.display(), "clone complete");
        Ok(())
    }
}

/// State of a finished clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneReport {
    pub path: PathBuf,
    /// Checked-out branch (None if HEAD is detached).
    pub branch: Option<String>,
    /// Commit id at HEAD.
    pub head: Option<String>,
    /// No staged, unstaged or untracked changes.
    pub clean: bool,
}

/// Inspect a cloned working tree.
///
/// # Errors
///
/// Returns a `GitError` if `path` is not a readable repository.
pub fn inspect_clone(path: &Path) -> MercatorResult<CloneReport> {
    let path = normalize_path(path);
    Ok(CloneReport {
        branch: query::current_branch(&path)?,
        head: query::head_commit(&path)?,
        clean: !query::has_uncommitted_changes(&path)?,
        path,
    })
}
