// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Durable State Store: atomic load/save of the registry, with
//! crash-safe temp-file cleanup and corrupt-file recovery.

use chrono::{DateTime, Utc};
use harness_core::{atomic_write, HarnessError, State};
use std::path::{Path, PathBuf};

use crate::event_log::{Event, EventKind, EventLog};

/// Reads and writes `state.json` under a home directory.
///
/// Readers take a snapshot via [`StateStore::load`]; writers reload-modify-
/// write under the Controller Lease (the store itself never serializes
/// concurrent writers — that's `harness-lease`'s job — and never retries on
/// its own, per §4.C).
pub struct StateStore {
    home: PathBuf,
}

impl StateStore {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.home.join("state.json")
    }

    fn tmp_path(&self) -> PathBuf {
        let path = self.registry_path();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("state.json");
        path.with_file_name(format!("{file_name}.tmp"))
    }

    /// Load the registry.
    ///
    /// A leftover `state.json.tmp` means a prior write crashed between
    /// write-temp and rename; it's deleted before reading so a future write
    /// doesn't collide with it. A missing `state.json` is an empty `State`,
    /// not an error. A present-but-malformed `state.json` surfaces
    /// [`HarnessError::StateCorrupt`] for the caller to route to
    /// [`StateStore::repair`].
    pub fn load(&self) -> Result<State, HarnessError> {
        let tmp = self.tmp_path();
        if tmp.exists() {
            let _ = std::fs::remove_file(&tmp);
        }

        let path = self.registry_path();
        if !path.exists() {
            return Ok(State::default());
        }

        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| HarnessError::StateCorrupt(format!("{}: {e}", path.display())))
    }

    /// Serialize and atomically write `state` over the registry.
    pub fn save(&self, state: &State) -> Result<(), HarnessError> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| HarnessError::StateCorrupt(format!("failed to serialize state: {e}")))?;
        atomic_write(&self.registry_path(), &bytes)?;
        Ok(())
    }

    /// Recover from a corrupt registry: move `state.json` aside, return a
    /// fresh empty `State`, and record a `StateRepaired` event. Never fails
    /// on a missing file (nothing to back up).
    pub fn repair(&self, event_log: &EventLog, now: DateTime<Utc>) -> Result<State, HarnessError> {
        let path = self.registry_path();
        if path.exists() {
            let backup = backup_path_for(&path, now);
            std::fs::rename(&path, &backup)?;
            event_log.append(
                &Event::new(EventKind::StateRepaired, now)
                    .with_field("backup_path", backup.display().to_string()),
            );
        }
        Ok(State::default())
    }
}

fn backup_path_for(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("state.json");
    path.with_file_name(format!("{file_name}.corrupt.{}", now.format("%Y%m%dT%H%M%S%.fZ")))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
