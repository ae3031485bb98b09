// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `bootstrap [--apply]`: discover Git repositories under a directory and
//! offer to register them as projects (§6). Never touches the Controller
//! Lease: a dry run reads nothing mutable, and `--apply` is a plain registry
//! append the user explicitly opted into.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_core::Project;

use crate::config::Config;

#[derive(Args)]
pub struct BootstrapArgs {
    /// Register discovered repositories as projects
    #[arg(long)]
    pub apply: bool,
    /// Directory to scan for Git repositories (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

pub async fn handle(args: BootstrapArgs, config: &Config) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let store = config.registry();
    let mut state = store.load()?;
    let known: HashSet<PathBuf> = state.projects.iter().map(|p| p.repo_path.clone()).collect();

    let candidates = discover_repos(&root)?;
    let new_candidates: Vec<PathBuf> = candidates.into_iter().filter(|c| !known.contains(c)).collect();

    if new_candidates.is_empty() {
        println!("no new Git repositories found under {}", root.display());
        return Ok(());
    }

    for candidate in &new_candidates {
        println!("{} {}", if args.apply { "registering" } else { "found" }, candidate.display());
    }

    if !args.apply {
        println!("re-run with --apply to register these");
        return Ok(());
    }

    let now = Utc::now();
    let added = new_candidates.len();
    for candidate in new_candidates {
        let name = candidate.file_name().and_then(|n| n.to_str()).unwrap_or("project").to_string();
        state.projects.push(Project::new(name, candidate, now));
    }
    store.save(&state)?;
    println!("registered {added} project(s)");

    Ok(())
}

/// Find `root` itself and its direct child directories that are Git
/// repositories (contain a `.git` entry). Non-recursive: a fast, predictable
/// scan rather than a full filesystem walk.
fn discover_repos(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if root.join(".git").exists() {
        found.push(root.canonicalize()?);
    }

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Ok(found),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        if path.join(".git").exists() {
            found.push(path.canonicalize()?);
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}
