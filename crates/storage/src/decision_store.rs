// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Per-project Doc Decision store: `<repoPath>/.harness/doc_decisions.json`.
//!
//! Shares the registry's atomic-write primitive (one function, three call
//! sites per §4.C) rather than a bespoke write path.

use harness_core::{atomic_write, DocDecision, DriftItemId, HarnessError};
use std::path::{Path, PathBuf};

pub struct DocDecisionStore {
    path: PathBuf,
}

impl DocDecisionStore {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        Self { path: repo_path.as_ref().join(".harness").join("doc_decisions.json") }
    }

    pub fn load(&self) -> Result<Vec<DocDecision>, HarnessError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| HarnessError::StateCorrupt(format!("{}: {e}", self.path.display())))
    }

    pub fn save(&self, decisions: &[DocDecision]) -> Result<(), HarnessError> {
        let bytes = serde_json::to_vec_pretty(decisions)
            .map_err(|e| HarnessError::StateCorrupt(format!("failed to serialize decisions: {e}")))?;
        atomic_write(&self.path, &bytes)?;
        Ok(())
    }

    /// Find the most recent decision for `item_id`, if any.
    ///
    /// There may be multiple records for the same item (a chain of
    /// re-defers, per §4.I); the most recently created one governs.
    pub fn find(&self, item_id: &DriftItemId) -> Result<Option<DocDecision>, HarnessError> {
        let mut matches: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|d| &d.item_id == item_id)
            .collect();
        matches.sort_by_key(|d| d.created_at);
        Ok(matches.pop())
    }

    /// Append a new decision record (never mutates an existing one; see
    /// [`harness_core::DocDecision::redefer`]).
    pub fn record(&self, decision: DocDecision) -> Result<(), HarnessError> {
        let mut decisions = self.load()?;
        decisions.push(decision);
        self.save(&decisions)
    }
}

#[cfg(test)]
#[path = "decision_store_tests.rs"]
mod tests;
