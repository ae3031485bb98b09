// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `doctor [--repair-state]`: check registry and lock health, optionally
//! repairing a corrupt registry (§7).

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_lease::LeasePaths;

use crate::config::Config;

#[derive(Args)]
pub struct DoctorArgs {
    /// Move a corrupt registry aside and start fresh
    #[arg(long)]
    pub repair_state: bool,
    /// Force a stale-lock takeover without prompting; only used with --repair-state
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: DoctorArgs, config: &Config) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let mut healthy = true;

    print!("registry readable ... ");
    match store.load() {
        Ok(_) => println!("ok"),
        Err(err) => {
            println!("FAIL: {err}");
            if args.repair_state {
                let now = Utc::now();
                let lease = super::acquire_lease(config, &event_log, now, args.force)?;
                store.repair(&event_log, now)?;
                println!("repaired: registry backed up and reset to empty");
                lease.release(&event_log, Utc::now());
            } else {
                healthy = false;
            }
        }
    }

    let paths = LeasePaths::under(&config.home);
    print!("lock/heartbeat consistency ... ");
    match (paths.lock.exists(), paths.heartbeat.exists()) {
        (false, false) => println!("ok (no active lease)"),
        (true, true) => println!("ok (lease held)"),
        _ => {
            println!("WARN: lock and heartbeat files disagree on existence");
        }
    }

    if healthy {
        println!("doctor: all checks passed");
        Ok(())
    } else {
        Err(harness_core::HarnessError::StateCorrupt("registry failed health check; re-run with --repair-state".to_string()).into())
    }
}
