// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!              clone.rs (Source)
//!           /      |       |      \
//!          v       v       v       v
//!      refs.rs  auth/  known_hosts/  url.rs
//!          \       |       |       /
//!           v      v       v      v
//!      ,-----------------------------,
//!      |      backend (traits)       |
//!      '----+-----------------+------'
//!           |                 |
//!           v                 v
//!       GitQuery          GitClone
//!     (gix, read)     (libgit2, fetch)
//!           |                 |
//!           v                 v
//!      GixBackend        Git2Backend
//!      .is_repo          .clone_branch
//!      .branch             credentials
//!      .head               host keys
//!      .uncommit           progress.rs
//! ```
//!
//! **`GixBackend`**: pure Rust, read-only, used by `query.rs`.
//! **`Git2Backend`**: libgit2 clone with in-memory SSH keys.

pub mod auth;
pub mod backend;
pub mod clone;
pub mod known_hosts;
pub mod progress;
pub mod query;
pub mod refs;
pub mod url;

pub use clone::{CloneOptions, CloneReport, Source, inspect_clone};

#[cfg(test)]
pub(crate) mod fixture;
