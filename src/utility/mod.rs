// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   normalize_path()  lexical clean, no filesystem access
//!   ensure_dir()      create_dir_all when absent
//!   walk:  list_tree(), WalkOptions
//! ```

pub mod fs;
