// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `clean`: remove a run's worktree, and optionally its branch (§4.F).

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_core::SystemClock;
use harness_lifecycle::LifecycleEngine;

use crate::config::Config;

#[derive(Args)]
pub struct CleanArgs {
    /// Name of the run to clean up
    pub run_name: String,
    /// Also delete the run's local branch
    #[arg(long)]
    pub delete_branch: bool,
    /// Clean up even if the run is neither finished nor parked
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: CleanArgs, config: &Config) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();

    let lease = super::acquire_lease(config, &event_log, now, args.force)?;
    super::drain_inbox(config, &store)?;

    let state = store.load()?;
    let run = state
        .runs
        .iter()
        .find(|r| r.run_name == args.run_name)
        .cloned()
        .ok_or_else(|| harness_core::HarnessError::MissingWorktree { run_name: args.run_name.clone() })?;

    let engine = LifecycleEngine::new(SystemClock);
    engine.clean(&store, &event_log, lease.session_id, run.id, args.delete_branch, args.force).await?;

    println!("cleaned {}", args.run_name);

    lease.release(&event_log, Utc::now());
    Ok(())
}
