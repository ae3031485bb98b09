// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Serialization and mutation of the handoff document.
//!
//! `write` always emits the modern `{meta, tasks}` form, regardless of which
//! form was read — the legacy bare-array form is read-only compatibility,
//! never round-tripped verbatim.

use harness_core::{Handoff, HarnessError, TaskId};
use std::path::Path;

/// Serialize `handoff` in modern form and write it atomically to `path`.
///
/// Reuses the same write-tmp-then-rename primitive the registry uses, even
/// though this file lives inside a worktree rather than the home directory,
/// so a crash mid-write never leaves a torn handoff for the agent to read.
pub fn write(handoff: &Handoff, path: &Path) -> Result<(), HarnessError> {
    let bytes = serde_json::to_vec_pretty(handoff)
        .map_err(|e| HarnessError::SchemaError(format!("failed to serialize handoff: {e}")))?;
    harness_core::atomic_write(path, &bytes)?;
    Ok(())
}

/// Return a copy of `handoff` with `task_id` marked as passing.
///
/// Enforces the monotonic `false → true` rule: this function never sets
/// `passes` back to `false`. Marking an already-passing task is a no-op
/// that still succeeds (idempotent).
pub fn mark_pass(handoff: &Handoff, task_id: &TaskId) -> Result<Handoff, HarnessError> {
    let mut next = handoff.clone();
    let task = next
        .tasks
        .iter_mut()
        .find(|t| &t.id == task_id)
        .ok_or_else(|| HarnessError::SchemaError(format!("unknown task id: {task_id}")))?;
    task.passes = true;
    Ok(next)
}

#[cfg(test)]
#[path = "write_tests.rs"]
mod tests;
