// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `status`: render the reconciled view of every project and run, plus any
//! drift the Reconciler found (§4.G). Read-only; takes no lease.

use anyhow::Result;
use harness_core::SystemClock;
use harness_lifecycle::{Drift, Reconciler};

use crate::config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let store = config.registry();
    let state = store.load()?;
    let reconciler = Reconciler::new(SystemClock);
    let view = reconciler.reconcile(&state).await?;

    for project in &view.state.projects {
        println!("{}", crate::color::header(&project.name));
        for run in view.state.runs_for_project(project.id) {
            println!("  {} [{:?}] {}", run.run_name, run.state, run.branch_name);
        }
    }

    if view.drift.is_empty() {
        println!("{}", crate::color::muted("no drift detected"));
    } else {
        println!("drift:");
        for drift in &view.drift {
            println!("  {}", describe_drift(drift));
        }
    }

    Ok(())
}

fn describe_drift(drift: &Drift) -> String {
    match drift {
        Drift::MissingWorktree { run_id } => format!("run {run_id}: worktree missing on disk, parked"),
        Drift::MarkerMissing { run_id } => format!("run {run_id}: marker file missing"),
        Drift::BranchChanged { run_id, actual } => format!("run {run_id}: worktree now on branch {actual}"),
        Drift::UnknownWorktree { path, branch } => format!(
            "unregistered worktree at {} ({})",
            path.display(),
            branch.as_deref().unwrap_or("detached")
        ),
        Drift::DirtyTree { project_id } => format!("project {project_id}: working tree is dirty"),
    }
}
