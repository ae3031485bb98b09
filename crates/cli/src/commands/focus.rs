// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `focus [set <id|name>]`: show or change the focused project (§6).

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: Option<FocusCommand>,
}

#[derive(Subcommand)]
pub enum FocusCommand {
    /// Set the focused project by id or name
    Set {
        id_or_name: String,
        /// Force a stale-lock takeover without prompting
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle(args: FocusArgs, config: &Config) -> Result<()> {
    let store = config.registry();

    let Some(FocusCommand::Set { id_or_name, force }) = args.command else {
        let state = store.load()?;
        match state.focus_project() {
            Some(project) => println!("{} ({})", project.name, project.repo_path.display()),
            None => println!("no project is focused"),
        }
        return Ok(());
    };

    let event_log = config.event_log();
    let now = Utc::now();
    let lease = super::acquire_lease(config, &event_log, now, force)?;
    super::drain_inbox(config, &store)?;

    let mut state = store.load()?;
    let project = state
        .project_by_id_or_name(&id_or_name)
        .cloned()
        .ok_or_else(|| harness_core::HarnessError::SchemaError(format!("unknown project: {id_or_name}")))?;
    state.focus_project_id = Some(project.id);
    store.save(&state)?;

    println!("focused {}", project.name);
    lease.release(&event_log, Utc::now());
    Ok(())
}
