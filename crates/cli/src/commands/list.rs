// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `list`: enumerate known projects and runs. Read-only; takes no lease.

use anyhow::Result;
use harness_core::SystemClock;
use harness_lifecycle::Reconciler;

use crate::config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let store = config.registry();
    let state = store.load()?;
    let reconciler = Reconciler::new(SystemClock);
    let view = reconciler.reconcile(&state).await?;

    if view.state.projects.is_empty() {
        println!("no projects registered yet; run `bootstrap` or `start` to register one");
        return Ok(());
    }

    for project in &view.state.projects {
        let focused = view.state.focus_project_id == Some(project.id);
        println!("{}{}  {}", if focused { "* " } else { "  " }, project.name, project.repo_path.display());
        for run in view.state.runs_for_project(project.id) {
            println!("    {:<24} {:?}  {}", run.run_name, run.state, run.branch_name);
        }
    }

    Ok(())
}
