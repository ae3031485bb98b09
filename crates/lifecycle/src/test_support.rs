// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Shared fixture helpers for tests that need a real Git repository rather
//! than a checked-in binary fixture (§10.5).

use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git").args(args).current_dir(dir).output().expect("git invocation failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a repo at `dir` with one commit on `main` and identity config
/// set, so every test starts from a clean, reconcilable state.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "--initial-branch=main"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
    std::fs::write(dir.join("README.md"), "# fixture\n").unwrap();
    commit_all(dir, "initial commit");
}

/// Stage and commit everything currently in the working tree.
pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-m", message]);
}

/// Write an uncommitted change so the working tree shows up dirty.
pub fn dirty_file(dir: &Path) {
    std::fs::write(dir.join("scratch.txt"), "uncommitted\n").unwrap();
}
