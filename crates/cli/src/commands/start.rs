// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `start`: create a worktree and branch for a new run (§4.F).

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use harness_core::SystemClock;
use harness_lifecycle::LifecycleEngine;

use crate::config::Config;

#[derive(Copy, Clone, ValueEnum)]
pub enum Mode {
    Greenfield,
    Brownfield,
}

#[derive(Args)]
pub struct StartArgs {
    /// Name for the new run; its branch becomes run/<runName>
    pub run_name: String,
    /// Path to the Git repository to run against
    #[arg(long)]
    pub repo_path: PathBuf,
    /// Path to an existing handoff document; omit for a generated stub in greenfield mode
    #[arg(long)]
    pub handoff_path: Option<PathBuf>,
    /// Whether this run starts against an empty scaffold or an existing codebase
    #[arg(long, value_enum, default_value_t = Mode::Greenfield)]
    pub mode: Mode,
    /// Force a stale-lock takeover without prompting
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: StartArgs, config: &Config) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();

    let lease = super::acquire_lease(config, &event_log, now, args.force)?;
    super::drain_inbox(config, &store)?;

    let project = super::resolve_or_register_project(&store, &args.repo_path, now)?;

    let handoff_path = match &args.handoff_path {
        Some(path) => path.clone(),
        None if matches!(args.mode, Mode::Brownfield) => {
            return Err(harness_core::HarnessError::SchemaError(
                "brownfield mode requires --handoff-path".to_string(),
            )
            .into());
        }
        None => super::write_stub_handoff(&project.name, &args.run_name)?,
    };

    let engine = LifecycleEngine::new(SystemClock);
    let run = engine
        .start(&store, &event_log, lease.session_id, &project, &args.run_name, &handoff_path)
        .await?;

    println!("created run {} on branch {} at {}", run.run_name, run.branch_name, run.worktree_path.display());

    lease.release(&event_log, Utc::now());
    Ok(())
}
