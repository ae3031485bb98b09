// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The error taxonomy shared by every component.
//!
//! Each variant maps to exactly one process exit code via [`HarnessError::exit_code`],
//! so the exit-code table is enforced in one place instead of scattered literals
//! through command handlers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("malformed handoff: {0}")]
    SchemaError(String),

    #[error("registry is corrupt: {0}")]
    StateCorrupt(String),

    #[error("controller lease held by pid {pid} (session {session_id})")]
    LockHeld { pid: u32, session_id: String },

    #[error("lock file and heartbeat file disagree on session id; pass --force to take over")]
    LockInconsistent,

    #[error("working tree at {path} is dirty; commit or stash changes first")]
    DirtyTree { path: PathBuf },

    #[error("{what} already exists: {name}")]
    Conflict { what: &'static str, name: String },

    #[error("worktree for run {run_name} is missing on disk")]
    MissingWorktree { run_name: String },

    #[error("marker file .harness-worktree is missing from {path}")]
    MarkerMissing { path: PathBuf },

    #[error("refusing to touch {path}: not a harness-managed worktree")]
    UnsafePath { path: PathBuf },

    #[error("push rejected (non-fast-forward): {remote_ref}")]
    PushRejected { remote_ref: String },

    #[error("push failed to authenticate against the remote")]
    AuthError,

    #[error("{count} undocumented surface change(s) remain unresolved")]
    DocDrift { count: usize },

    #[error("git {args} failed: {stderr}")]
    GitError { args: String, stderr: String, timed_out: bool },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Process exit code for this error, per the command surface's exit-code table.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::SchemaError(_) => 2,
            HarnessError::LockHeld { .. } | HarnessError::LockInconsistent => 3,
            HarnessError::DirtyTree { .. } => 4,
            HarnessError::UnsafePath { .. } => 5,
            HarnessError::DocDrift { .. } => 6,
            HarnessError::PushRejected { .. } => 7,
            HarnessError::StateCorrupt(_)
            | HarnessError::Conflict { .. }
            | HarnessError::MissingWorktree { .. }
            | HarnessError::MarkerMissing { .. }
            | HarnessError::AuthError
            | HarnessError::GitError { .. }
            | HarnessError::Io(_) => 1,
        }
    }

    /// One-line remediation hint shown under the error message, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            HarnessError::DirtyTree { .. } => Some("Commit or stash changes first"),
            HarnessError::LockHeld { .. } => {
                Some("Wait for the other session to finish, or pass --force once you've confirmed it's gone")
            }
            HarnessError::StateCorrupt(_) => Some("Run `doctor --repair-state` to recover"),
            HarnessError::MissingWorktree { .. } => Some("Run `status` to reconcile, or `clean` to drop the run"),
            HarnessError::DocDrift { .. } => Some("Resolve drift interactively, or without --doc-strict"),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
