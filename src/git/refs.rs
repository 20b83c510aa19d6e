// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch reference construction.
//!
//! ```text
//! "main" --> refs/heads/main
//!            refs/remotes/origin/main
//!            +refs/heads/main:refs/remotes/origin/main
//! ```

use std::fmt;

/// Name of the remote created by a clone.
pub const DEFAULT_REMOTE: &str = "origin";

const HEADS_PREFIX: &str = "refs/heads/";

/// A branch expanded to its full reference name.
///
/// The input is always treated as a short name: `refs/heads/` is prepended
/// unconditionally, exactly once. Names are not rejected here; a name the
/// remote cannot have fails the clone as a missing reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    full: String,
}

impl BranchRef {
    /// Build `refs/heads/<branch>`.
    #[must_use]
    pub fn new(branch: &str) -> Self {
        Self {
            full: format!("{HEADS_PREFIX}{branch}"),
        }
    }

    /// Whether the full name satisfies git's reference naming rules.
    ///
    /// False for an empty short name, since `refs/heads/` alone is no branch.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.short().is_empty() && git2::Reference::is_valid_name(&self.full)
    }

    /// Full reference name, e.g. `refs/heads/main`.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Short branch name as given by the caller.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.full[HEADS_PREFIX.len()..]
    }

    /// Remote-tracking reference under `remote`.
    #[must_use]
    pub fn remote_tracking(&self, remote: &str) -> String {
        format!("refs/remotes/{remote}/{}", self.short())
    }

    /// Forced fetch refspec mapping only this branch.
    #[must_use]
    pub fn refspec(&self, remote: &str) -> String {
        format!("+{}:{}", self.full, self.remote_tracking(remote))
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
