// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use crate::exec::{failure, run_git, GIT_TIMEOUT};
use harness_core::HarnessError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub clean: bool,
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    pub branch: Option<String>,
    pub head: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Ok,
    Rejected,
    AuthError,
}

/// Thin wrapper around the `git` binary for one repository root.
///
/// Stateless aside from `repo_path`: never reads or writes the run
/// registry, never caches results across calls.
pub struct GitDriver {
    repo_path: PathBuf,
}

impl GitDriver {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self { repo_path: repo_path.into() }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Status of the working tree rooted at `path` (typically a worktree,
    /// sometimes the repo root itself).
    pub async fn status(&self, path: &Path) -> Result<StatusReport, HarnessError> {
        let args = ["status", "--porcelain=v2", "--branch"];
        let output = run_git(&args, Some(path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
    }

    pub async fn worktree_list(&self) -> Result<Vec<WorktreeEntry>, HarnessError> {
        let args = ["worktree", "list", "--porcelain"];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(parse_worktree_list(&String::from_utf8_lossy(&output.stdout)))
    }

    pub async fn worktree_add(
        &self,
        path: &Path,
        branch: &str,
        base_ref: &str,
    ) -> Result<(), HarnessError> {
        let path_str = path.display().to_string();
        let args = ["worktree", "add", "-b", branch, &path_str, base_ref];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(())
    }

    pub async fn worktree_remove(&self, path: &Path, force: bool) -> Result<(), HarnessError> {
        let path_str = path.display().to_string();
        let mut argv = vec!["worktree", "remove"];
        if force {
            argv.push("--force");
        }
        argv.push(&path_str);
        let output = run_git(&argv, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&argv, &output));
        }
        Ok(())
    }

    pub async fn branch_create(&self, name: &str, base_ref: &str) -> Result<(), HarnessError> {
        let args = ["branch", name, base_ref];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(())
    }

    pub async fn branch_delete(&self, name: &str, force: bool) -> Result<(), HarnessError> {
        let flag = if force { "-D" } else { "-d" };
        let args = ["branch", flag, name];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(())
    }

    pub async fn push(&self, remote: &str, branch: &str) -> Result<PushOutcome, HarnessError> {
        let args = ["push", remote, branch];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if output.status.success() {
            return Ok(PushOutcome::Ok);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(classify_push_failure(&stderr))
    }

    pub async fn log(&self, git_ref: &str, n: usize) -> Result<Vec<String>, HarnessError> {
        let count = n.to_string();
        let args = ["log", "--oneline", "-n", &count, git_ref];
        let output = run_git(&args, Some(&self.repo_path), GIT_TIMEOUT).await?;
        if !output.status.success() {
            return Err(failure(&args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.to_string())
            .collect())
    }
}

fn classify_push_failure(stderr: &str) -> PushOutcome {
    let lower = stderr.to_lowercase();
    let auth_markers = [
        "permission denied",
        "authentication failed",
        "could not read username",
        "could not read password",
        "fatal: authentication",
    ];
    if auth_markers.iter().any(|m| lower.contains(m)) {
        PushOutcome::AuthError
    } else {
        PushOutcome::Rejected
    }
}

/// Parse `git status --porcelain=v2 --branch` output.
///
/// The branch header lines look like:
///   # branch.head main
///   # branch.ab +1 -0
/// Any remaining non-`#` line means the tree is dirty.
fn parse_status(raw: &str) -> StatusReport {
    let mut branch = String::new();
    let mut ahead = 0;
    let mut behind = 0;
    let mut clean = true;

    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("# branch.head ") {
            branch = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("# branch.ab ") {
            for token in rest.split_whitespace() {
                if let Some(n) = token.strip_prefix('+') {
                    ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = token.strip_prefix('-') {
                    behind = n.parse().unwrap_or(0);
                }
            }
        } else if !line.starts_with('#') && !line.trim().is_empty() {
            clean = false;
        }
    }

    StatusReport { clean, branch, ahead, behind }
}

/// Parse `git worktree list --porcelain` output: blank-line-separated
/// stanzas of `worktree <path>` / `HEAD <sha>` / `branch <ref>` lines.
fn parse_worktree_list(raw: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut head = String::new();
    let mut branch: Option<String> = None;

    let flush = |path: &mut Option<PathBuf>, head: &mut String, branch: &mut Option<String>, out: &mut Vec<WorktreeEntry>| {
        if let Some(p) = path.take() {
            out.push(WorktreeEntry { path: p, branch: branch.take(), head: std::mem::take(head) });
        }
    };

    for line in raw.lines() {
        if line.is_empty() {
            flush(&mut path, &mut head, &mut branch, &mut entries);
            continue;
        }
        if let Some(rest) = line.strip_prefix("worktree ") {
            flush(&mut path, &mut head, &mut branch, &mut entries);
            path = Some(PathBuf::from(rest));
        } else if let Some(rest) = line.strip_prefix("HEAD ") {
            head = rest.to_string();
        } else if let Some(rest) = line.strip_prefix("branch ") {
            branch = Some(
                rest.strip_prefix("refs/heads/").unwrap_or(rest).to_string(),
            );
        }
    }
    flush(&mut path, &mut head, &mut branch, &mut entries);

    entries
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
