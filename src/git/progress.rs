// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone progress reporting.
//!
//! ```text
//! engine callbacks          CloneProgress
//!   sideband_progress  -->  remote_message()
//!   transfer_progress  -->  transfer()
//!   checkout progress  -->  checkout()
//!   clone returned     -->  finish()
//!
//! ProgressDisplay
//!   Text    remote messages copied to stdout
//!   Bar     [=====>     ] objects received
//!   Silent  (none)
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

/// Snapshot of the engine's transfer counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferStats {
    pub total_objects: usize,
    pub received_objects: usize,
    pub indexed_objects: usize,
    pub local_objects: usize,
    pub total_deltas: usize,
    pub indexed_deltas: usize,
    pub received_bytes: usize,
}

impl From<&git2::Progress<'_>> for TransferStats {
    fn from(progress: &git2::Progress<'_>) -> Self {
        Self {
            total_objects: progress.total_objects(),
            received_objects: progress.received_objects(),
            indexed_objects: progress.indexed_objects(),
            local_objects: progress.local_objects(),
            total_deltas: progress.total_deltas(),
            indexed_deltas: progress.indexed_deltas(),
            received_bytes: progress.received_bytes(),
        }
    }
}

/// Receiver of clone progress. Every method defaults to a no-op.
pub trait CloneProgress {
    /// Text relayed from the remote (`Counting objects: ...`).
    fn remote_message(&mut self, _data: &[u8]) {}

    /// Object transfer counters changed.
    fn transfer(&mut self, _stats: &TransferStats) {}

    /// A working tree file was checked out.
    fn checkout(&mut self, _path: Option<&Path>, _completed: usize, _total: usize) {}

    /// The clone returned, successfully or not.
    fn finish(&mut self) {}
}

/// How clone progress is displayed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProgressDisplay {
    /// Copy the remote's progress text to stdout
    #[default]
    Text,
    /// Show a progress bar over received objects
    Bar,
    /// No progress output
    Silent,
}

impl ProgressDisplay {
    /// Create the sink for this display mode.
    #[must_use]
    pub fn sink(self) -> Box<dyn CloneProgress + Send> {
        match self {
            Self::Text => Box::new(TextProgress::new(std::io::stdout())),
            Self::Bar => Box::new(BarProgress::default()),
            Self::Silent => Box::new(SilentProgress),
        }
    }
}

impl std::fmt::Display for ProgressDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Bar => write!(f, "bar"),
            Self::Silent => write!(f, "silent"),
        }
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl CloneProgress for SilentProgress {}

/// Writes remote progress text to a writer, stdout by default.
#[derive(Debug)]
pub struct TextProgress<W: Write> {
    out: W,
}

impl<W: Write> TextProgress<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CloneProgress for TextProgress<W> {
    fn remote_message(&mut self, data: &[u8]) {
        // best-effort
        let _ = self.out.write_all(data);
        let _ = self.out.flush();
    }
}

/// Pre-validated progress bar style for object counts.
fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} objects {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Progress bar over received objects, then checked-out files.
#[derive(Debug, Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    fn bar(&mut self, total: usize) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(bar_style());
            bar
        })
    }
}

impl CloneProgress for BarProgress {
    fn transfer(&mut self, stats: &TransferStats) {
        let bar = self.bar(stats.total_objects);
        bar.set_length(stats.total_objects as u64);
        bar.set_position(stats.received_objects as u64);
        bar.set_message(format!("({} KiB)", stats.received_bytes / 1024));
    }

    fn checkout(&mut self, _path: Option<&Path>, completed: usize, total: usize) {
        let bar = self.bar(total);
        bar.set_length(total as u64);
        bar.set_position(completed as u64);
        bar.set_message("checking out");
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
