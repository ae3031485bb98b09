// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `run`: spawn the agent in an existing run's worktree (§4.F, §9). This is
//! the only command handler that constructs an `AgentLauncher`.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_core::SystemClock;
use harness_lifecycle::{LifecycleEngine, ProcessAgentLauncher};

use crate::config::Config;

#[derive(Args)]
pub struct RunArgs {
    /// Name of the run whose worktree the agent should operate in
    pub run_name: String,
    /// Path to the Git repository the run belongs to
    #[arg(long)]
    pub repo_path: PathBuf,
    /// Agent binary to launch in the run's worktree
    #[arg(long, env = "HARNESS_AGENT_COMMAND", default_value = "harness-agent")]
    pub agent_command: String,
    /// Force a stale-lock takeover without prompting
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: RunArgs, config: &Config) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();

    let lease = super::acquire_lease(config, &event_log, now, args.force)?;
    super::drain_inbox(config, &store)?;

    let project = super::resolve_or_register_project(&store, &args.repo_path, now)?;
    let state = store.load()?;
    let run = state
        .run_by_name(project.id, &args.run_name)
        .cloned()
        .ok_or_else(|| harness_core::HarnessError::MissingWorktree { run_name: args.run_name.clone() })?;

    let launcher = ProcessAgentLauncher { command: args.agent_command };
    let engine = LifecycleEngine::new(SystemClock);
    let updated = engine.run(&store, &event_log, lease.session_id, run.id, &launcher).await?;

    match &updated.last_result {
        Some(result) => println!("{} exited: {}", updated.run_name, result),
        None => println!("{} finished", updated.run_name),
    }

    lease.release(&event_log, Utc::now());
    Ok(())
}
