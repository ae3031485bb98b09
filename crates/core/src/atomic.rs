// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Atomic file writes: write-tmp-then-rename, shared by the registry, the
//! in-worktree handoff copy, and the doc-decision store — one primitive,
//! three call sites, instead of three ad hoc implementations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` atomically: the file at `path` either has its
/// old contents or its new contents, never a partial write, even if the
/// process is killed mid-operation.
///
/// Writes a sibling `<name>.tmp` file in the same directory (so the final
/// rename is same-filesystem and therefore atomic), fsyncs it, then renames
/// it over `path`.
pub fn atomic_write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let tmp_path = tmp_path_for(path);
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(contents)?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("tmp");
    path.with_file_name(format!("{file_name}.tmp"))
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
