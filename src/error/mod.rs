// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            MercatorError (~24 bytes)
//!                     |
//!     +-------+-------+-------+-------+
//!     v       v       v       v       v
//!   Clone    Git    Config    Io    Other
//!    Box     Box     Box     Box   Box<str>
//!
//! CloneError  --kind()-->  CloneErrorKind
//!   AlreadyExists     local precondition, "repository already exists"
//!   KeyInvalid        PEM rejected locally
//!   Io                destination could not be created
//!   Engine{kind}      git2 error, message kept verbatim
//!
//! git2::Error --CloneErrorKind::from_engine--> ReferenceNotFound
//!   AuthRequired  HostKeyRejected  KeyInvalid  Transport  Cancelled ...
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`MercatorError`].
pub type MercatorResult<T> = std::result::Result<T, MercatorError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum MercatorError {
    /// Clone operation failed.
    #[error("clone error: {0}")]
    Clone(#[from] Box<CloneError>),

    /// Local repository query failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for MercatorError {
                fn from(err: $error) -> Self {
                    MercatorError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    CloneError => Clone,
    GitError => Git,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Clone Errors ---

/// Stable classification of clone failures.
///
/// Callers match on this instead of on engine message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneErrorKind {
    /// Requested branch does not exist on the remote.
    ReferenceNotFound,
    /// Remote rejected anonymous or keyed access. Hosts that hide private
    /// repositories also report missing repositories this way.
    AuthRequired,
    /// Destination already holds an initialized repository.
    AlreadyExists,
    /// Network or protocol failure talking to the remote.
    Transport,
    /// Private key could not be used (malformed, wrong or missing passphrase).
    KeyInvalid,
    /// SSH host key failed `known_hosts` verification.
    HostKeyRejected,
    /// Clone was aborted through its cancellation token.
    Cancelled,
    /// Local filesystem failure.
    Io,
    /// Anything the engine reports that fits none of the above.
    Other,
}

impl CloneErrorKind {
    /// Get a short string representation for log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReferenceNotFound => "reference not found",
            Self::AuthRequired => "authentication required",
            Self::AlreadyExists => "repository already exists",
            Self::Transport => "transport failure",
            Self::KeyInvalid => "invalid private key",
            Self::HostKeyRejected => "host key rejected",
            Self::Cancelled => "cancelled",
            Self::Io => "filesystem error",
            Self::Other => "other",
        }
    }

    /// Classify an error reported by the clone engine.
    ///
    /// Error codes are checked first. Message text is only consulted for the
    /// SSH and HTTP classes, where libgit2 reports no finer code.
    #[must_use]
    pub fn from_engine(err: &git2::Error) -> Self {
        use git2::{ErrorClass, ErrorCode};

        match err.code() {
            ErrorCode::User => return Self::Cancelled,
            ErrorCode::Auth => return Self::AuthRequired,
            ErrorCode::Certificate => return Self::HostKeyRejected,
            // an unusable branch name never resolves on the remote either
            ErrorCode::NotFound | ErrorCode::InvalidSpec
                if err.class() == ErrorClass::Reference =>
            {
                return Self::ReferenceNotFound;
            }
            _ => {}
        }

        let message = err.message().to_ascii_lowercase();
        match err.class() {
            ErrorClass::Ssh
                if message.contains("private key")
                    || message.contains("passphrase")
                    || message.contains("publickey from private") =>
            {
                Self::KeyInvalid
            }
            ErrorClass::Ssh if message.contains("authenticat") => Self::AuthRequired,
            ErrorClass::Http
                if message.contains("401")
                    || message.contains("authentication")
                    || message.contains("too many redirects or authentication replays") =>
            {
                Self::AuthRequired
            }
            ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssh | ErrorClass::Ssl => {
                Self::Transport
            }
            ErrorClass::Os | ErrorClass::Filesystem => Self::Io,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for CloneErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clone operation errors.
#[derive(Debug, Error)]
pub enum CloneError {
    /// Destination already contains an initialized repository.
    #[error("repository already exists")]
    AlreadyExists { path: PathBuf },

    /// Private key rejected before contacting the remote.
    #[error("invalid private key: {message}")]
    KeyInvalid { message: String },

    /// Destination could not be prepared.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error reported by the clone engine, message passed through unchanged.
    #[error("{}", .source.message())]
    Engine {
        kind: CloneErrorKind,
        #[source]
        source: git2::Error,
    },
}

impl CloneError {
    /// Stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> CloneErrorKind {
        match self {
            Self::AlreadyExists { .. } => CloneErrorKind::AlreadyExists,
            Self::KeyInvalid { .. } => CloneErrorKind::KeyInvalid,
            Self::Io(_) => CloneErrorKind::Io,
            Self::Engine { kind, .. } => *kind,
        }
    }

    /// The error a clone aborted through its cancellation token reports.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::from(cancelled_engine_error())
    }

    pub(crate) fn key_invalid(message: impl Into<String>) -> Self {
        Self::KeyInvalid {
            message: message.into(),
        }
    }
}

impl From<git2::Error> for CloneError {
    fn from(source: git2::Error) -> Self {
        Self::Engine {
            kind: CloneErrorKind::from_engine(&source),
            source,
        }
    }
}

/// Engine error raised from clone callbacks once cancellation is observed.
pub(crate) fn cancelled_engine_error() -> git2::Error {
    git2::Error::new(
        git2::ErrorCode::User,
        git2::ErrorClass::Callback,
        "clone cancelled",
    )
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Failed to resolve HEAD to a commit.
    #[error("failed to resolve head commit: {0}")]
    HeadId(#[from] Box<gix::reference::head_id::Error>),
}

// --- Git Errors ---

/// Local repository query errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Git status could not be computed.
    #[error("failed to check status of {path}: {message}")]
    StatusFailed { path: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file named by the configuration.
    #[error("failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Malformed `--set` override.
    #[error("invalid option '{0}', expected 'section/key=value'")]
    InvalidOverride(String),
}

#[cfg(test)]
mod tests;
