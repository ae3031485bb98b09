// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `finish`: push a completed run's branch and mark it finished (§4.F, §4.I).

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_core::SystemClock;
use harness_lifecycle::{check_doc_drift, DocDriftReport, LifecycleEngine, NeverResolve};
use harness_storage::DocDecisionStore;

use crate::config::Config;
use crate::interactive::TtyDocDriftResolver;

#[derive(Args)]
pub struct FinishArgs {
    /// Name of the run to finish
    pub run_name: String,
    /// Path to the Git repository the run belongs to
    #[arg(long)]
    pub repo_path: PathBuf,
    /// Path to the handoff document to validate against
    #[arg(long)]
    pub handoff_path: PathBuf,
    /// Abort if any undocumented surface change remains unresolved
    #[arg(long)]
    pub doc_strict: bool,
    /// Force a stale-lock takeover without prompting
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: FinishArgs, config: &Config) -> Result<()> {
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

    let decisions = DocDecisionStore::new(&project.repo_path);
    let flags = crate::doc_flags::declared_flags();
    let doc_files = [project.repo_path.join("README.md")];
    let agent_guide = project.repo_path.join("AGENTS.md");

    let doc_report: DocDriftReport = if config.interactive {
        check_doc_drift(&project.repo_path, &flags, &doc_files, &agent_guide, &decisions, &TtyDocDriftResolver, now)?
    } else {
        check_doc_drift(&project.repo_path, &flags, &doc_files, &agent_guide, &decisions, &NeverResolve, now)?
    };

    let engine = LifecycleEngine::new(SystemClock);
    let updated = engine
        .finish(&store, &event_log, lease.session_id, run.id, &args.handoff_path, doc_report, args.doc_strict)
        .await?;

    println!("finished {} ({})", updated.run_name, updated.branch_name);
    println!("open a pull request for {} against origin", updated.branch_name);

    lease.release(&event_log, Utc::now());
    Ok(())
}
