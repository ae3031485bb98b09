// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The literal flag strings this binary declares, fed to the Doc-Drift
//! Checker (§4.I) so an undocumented flag is caught the same way an
//! undocumented public file is.

const FLAGS: &[&str] = &[
    "--repo-path",
    "--handoff-path",
    "--mode",
    "--doc-strict",
    "--delete-branch",
    "--agent-command",
    "--list",
    "--promote",
    "--dismiss",
    "--repair-state",
    "--apply",
    "--root",
    "--force",
    "--set",
];

pub fn declared_flags() -> Vec<String> {
    FLAGS.iter().map(|f| f.to_string()).collect()
}
