// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Observer-mode inbox capture: the one place a non-lease-holder writes.
//!
//! Capturing an inbox item never opens `state.json` — it appends one JSON
//! line to a dedicated `inbox.log`. The controller drains this file into
//! the registry's inbox section on its next `save()` (§5, §9). Draining
//! renames the log aside before reading it, so a capture that races the
//! drain lands in a fresh file instead of being silently lost mid-read.

use harness_core::{HarnessError, InboxItem};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct InboxCaptureLog {
    path: PathBuf,
}

impl InboxCaptureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one captured item. Safe to call without holding the lease.
    pub fn capture(&self, item: &InboxItem) -> Result<(), HarnessError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(item)
            .map_err(|e| HarnessError::StateCorrupt(format!("failed to serialize inbox item: {e}")))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Drain every item captured so far and leave the log empty for future
    /// captures. Only the controller calls this, and only from inside its
    /// own reload-modify-write cycle.
    pub fn drain(&self) -> Result<Vec<InboxItem>, HarnessError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let draining_path = self.path.with_extension("log.draining");
        std::fs::rename(&self.path, &draining_path)?;

        let contents = std::fs::read_to_string(&draining_path)?;
        let items = contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();

        std::fs::remove_file(&draining_path)?;
        Ok(items)
    }
}

#[cfg(test)]
#[path = "inbox_log_tests.rs"]
mod tests;
