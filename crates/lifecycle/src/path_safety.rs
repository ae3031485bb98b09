// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Worktree Path Safety: the gate every destructive path operation passes
//! through before touching the filesystem (§4.G).

use harness_core::{HarnessError, Project};
use std::path::{Path, PathBuf};

/// The marker file dropped at the root of every harness-managed worktree.
pub const MARKER_FILE_NAME: &str = ".harness-worktree";

/// Checks `path` against the three-step safety gate: normalize, allowlist,
/// marker. Returns the canonicalized path on success so the caller operates
/// on the same path that was actually checked.
///
/// Never deletes anything itself — callers perform the destructive
/// operation only after this returns `Ok`.
pub fn check_worktree_path_safety(path: &Path, projects: &[Project]) -> Result<PathBuf, HarnessError> {
    let canonical = path
        .canonicalize()
        .map_err(|_| HarnessError::UnsafePath { path: path.to_path_buf() })?;

    // Worktrees always live at `<repoPath>/runs/<runName>` (§6), so "under a
    // registered project's repoPath" and "under the harness-managed
    // worktrees directory" are the same allowlist check in this layout.
    let allowlisted = projects.iter().any(|p| {
        p.repo_path
            .canonicalize()
            .map(|root| canonical.starts_with(&root))
            .unwrap_or(false)
    });
    if !allowlisted {
        return Err(HarnessError::UnsafePath { path: canonical });
    }

    if !canonical.join(MARKER_FILE_NAME).is_file() {
        return Err(HarnessError::UnsafePath { path: canonical });
    }

    Ok(canonical)
}

#[cfg(test)]
#[path = "path_safety_tests.rs"]
mod tests;
