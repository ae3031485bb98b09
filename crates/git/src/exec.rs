// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Subprocess runner: invoke `git` with a bounded timeout and capture output.

use harness_core::HarnessError;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Default bound on a single `git` invocation. Generous enough for worktree
/// operations against large repos, short enough that a hung `git` process
/// (e.g. blocked on a credential prompt) doesn't wedge the command.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `git <args>` in `cwd` (or the current directory if `None`), bounded by
/// `timeout`. Never touches a shell: `args` is passed straight through as an
/// argv vector.
pub async fn run_git(
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<std::process::Output, HarnessError> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    // Never let ambient repo-local env vars redirect us into the wrong tree.
    cmd.env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");

    let joined = args.join(" ");
    let label = format!("git {joined}");

    tracing::debug!(args = %joined, "running git");

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(HarnessError::GitError {
            args: label,
            stderr: io_err.to_string(),
            timed_out: false,
        }),
        Err(_elapsed) => Err(HarnessError::GitError {
            args: label,
            stderr: "timed out waiting for git".to_string(),
            timed_out: true,
        }),
    }
}

/// Convert a completed-but-failed `git` invocation into a [`HarnessError::GitError`].
pub fn failure(args: &[&str], output: &std::process::Output) -> HarnessError {
    HarnessError::GitError {
        args: args.join(" "),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        timed_out: false,
    }
}
