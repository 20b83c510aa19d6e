// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   clone, config (options / inis)
//! ```

pub mod clone;
pub mod config;
