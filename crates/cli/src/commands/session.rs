// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `session`: hold the Controller Lease interactively, refreshing the next
//! action on demand until the user cancels (§4.E, §9). The only command that
//! spawns a background heartbeat task — every other mutating command holds
//! the lease just for its own duration.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;
use harness_core::SystemClock;
use harness_lease::{Heartbeat, HEARTBEAT_INTERVAL};
use harness_lifecycle::{compute_next_action, Reconciler};
use harness_storage::{Event, EventKind};

use crate::config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();

    let lease = super::acquire_lease(config, &event_log, now, false)?;
    super::drain_inbox(config, &store)?;

    event_log.append(&Event::new(EventKind::SessionStarted, now).with_session(lease.session_id));
    let heartbeat = Heartbeat::spawn(lease.heartbeat_path().to_path_buf(), lease.session_id, HEARTBEAT_INTERVAL);

    println!("session started (pid {}); press Enter to refresh, q<Enter> to quit", lease.pid);
    let reconciler = Reconciler::new(SystemClock);
    let stdin = io::stdin();

    loop {
        let state = store.load()?;
        let view = reconciler.reconcile(&state).await?;
        let next = compute_next_action(&view, |run_id| {
            let run = view.state.run(run_id)?;
            let bytes = std::fs::read(run.worktree_path.join("handoff.json")).ok()?;
            harness_handoff::parse(&bytes).ok()
        });
        println!("next: {}", next.action);
        println!("  why:  {}", next.why);
        println!("  done: {}", next.done);

        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
    }

    heartbeat.stop().await;
    let end = Utc::now();
    event_log.append(&Event::new(EventKind::SessionEnded, end).with_session(lease.session_id));
    lease.release(&event_log, end);
    Ok(())
}
