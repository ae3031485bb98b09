// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `inbox`: capture, list, promote, or dismiss observations queued for
//! triage (§3, §5, §9). Capture is Observer-mode and lease-free; promote and
//! dismiss mutate the registry and require the Controller Lease.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use harness_core::{Category, InboxItem, InboxItemId, Task, TaskId};

use crate::config::Config;

#[derive(Args)]
pub struct InboxArgs {
    /// Free-form text to capture as a new inbox item
    pub text: Option<String>,
    /// List untriaged inbox items
    #[arg(long)]
    pub list: bool,
    /// Promote an inbox item into a task on the focus project's most recent run
    #[arg(long)]
    pub promote: Option<String>,
    /// Dismiss an inbox item without promoting it
    #[arg(long)]
    pub dismiss: Option<String>,
    /// Force a stale-lock takeover without prompting
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: InboxArgs, config: &Config) -> Result<()> {
    if args.list {
        return list(config);
    }
    if let Some(id) = args.promote {
        return promote(config, &id, args.force).await;
    }
    if let Some(id) = args.dismiss {
        return dismiss(config, &id, args.force).await;
    }
    let text = args.text.ok_or_else(|| {
        harness_core::HarnessError::SchemaError(
            "inbox requires text to capture, or one of --list/--promote/--dismiss".to_string(),
        )
    })?;
    capture(config, &text)
}

fn capture(config: &Config, text: &str) -> Result<()> {
    let item = InboxItem::new(text, Utc::now());
    config.inbox_log().capture(&item)?;
    println!("captured {}", item.id);
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let store = config.registry();
    let state = store.load()?;
    for item in state.untriaged_inbox() {
        println!("{}  {}", item.id, item.text);
    }
    Ok(())
}

async fn promote(config: &Config, id: &str, force: bool) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();
    let lease = super::acquire_lease(config, &event_log, now, force)?;
    super::drain_inbox(config, &store)?;

    let item_id = parse_item_id(id)?;
    let mut state = store.load()?;
    let item = state
        .inbox_item(item_id)
        .cloned()
        .ok_or_else(|| harness_core::HarnessError::SchemaError(format!("unknown inbox item: {id}")))?;

    if let Some(focus) = state.focus_project().cloned() {
        let mut runs: Vec<_> = state.runs_for_project(focus.id).collect();
        runs.sort_by_key(|r| r.created_at);
        if let Some(run) = runs.last().cloned() {
            append_task_to_handoff(&run.worktree_path.join("handoff.json"), &item.text);
        }
    }

    state
        .inbox_item_mut(item_id)
        .ok_or_else(|| harness_core::HarnessError::SchemaError(format!("unknown inbox item: {id}")))?
        .promote();
    store.save(&state)?;

    println!("promoted {item_id}");
    lease.release(&event_log, Utc::now());
    Ok(())
}

async fn dismiss(config: &Config, id: &str, force: bool) -> Result<()> {
    let store = config.registry();
    let event_log = config.event_log();
    let now = Utc::now();
    let lease = super::acquire_lease(config, &event_log, now, force)?;
    super::drain_inbox(config, &store)?;

    let item_id = parse_item_id(id)?;
    let mut state = store.load()?;
    state
        .inbox_item_mut(item_id)
        .ok_or_else(|| harness_core::HarnessError::SchemaError(format!("unknown inbox item: {id}")))?
        .dismiss();
    store.save(&state)?;

    println!("dismissed {item_id}");
    lease.release(&event_log, Utc::now());
    Ok(())
}

fn parse_item_id(id: &str) -> Result<InboxItemId, harness_core::HarnessError> {
    id.parse().map_err(|_| harness_core::HarnessError::SchemaError(format!("invalid inbox item id: {id}")))
}

/// Best-effort: if the run's handoff can be read, append a new task built
/// from the promoted item's text. A missing or unparseable handoff leaves
/// the promotion itself unaffected — only the triage status is guaranteed.
fn append_task_to_handoff(handoff_path: &std::path::Path, text: &str) {
    let Ok(bytes) = std::fs::read(handoff_path) else { return };
    let Ok(mut handoff) = harness_handoff::parse(&bytes) else { return };
    let task_number = handoff.tasks.len() + 1;
    handoff.tasks.push(Task {
        id: TaskId::synthesize(task_number),
        category: Category::Functional,
        title: text.to_string(),
        description: text.to_string(),
        acceptance_criteria: vec!["Resolved to the reporter's satisfaction".to_string()],
        passes: false,
        files_expected: None,
        steps: None,
    });
    let _ = harness_handoff::write(&handoff, handoff_path);
}
