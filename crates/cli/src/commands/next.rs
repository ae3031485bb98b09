// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `next`: print the single next action to take (§4.H). Read-only; takes no
//! lease.

use anyhow::Result;
use harness_core::SystemClock;
use harness_lifecycle::{compute_next_action, Reconciler};

use crate::config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let store = config.registry();
    let state = store.load()?;
    let reconciler = Reconciler::new(SystemClock);
    let view = reconciler.reconcile(&state).await?;

    let next = compute_next_action(&view, |run_id| {
        let run = view.state.run(run_id)?;
        let bytes = std::fs::read(run.worktree_path.join("handoff.json")).ok()?;
        harness_handoff::parse(&bytes).ok()
    });

    println!("{}", next.action);
    println!("  why:  {}", next.why);
    println!("  done: {}", next.done);

    Ok(())
}
