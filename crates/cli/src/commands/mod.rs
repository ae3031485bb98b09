// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Command handlers, one module per subcommand in the `harness` binary's
//! surface (§6).

pub mod bootstrap;
pub mod clean;
pub mod doctor;
pub mod finish;
pub mod focus;
pub mod inbox;
pub mod list;
pub mod next;
pub mod run;
pub mod session;
pub mod start;
pub mod status;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use harness_core::{HarnessError, Project, State};
use harness_lease::{AlwaysConfirm, ControllerLease, NeverConfirm, TakeoverPrompt};
use harness_storage::{EventLog, StateStore};

use crate::config::Config;
use crate::interactive::TtyTakeoverPrompt;

/// Find a registered project whose `repoPath` matches `repo_path`, or
/// register a new one and persist it. There is no standalone `project add`
/// verb in the command surface (§6) — registration happens the first time a
/// repo is named to `start`/`run`/`finish`, or via `bootstrap --apply`.
pub fn resolve_or_register_project(
    store: &StateStore,
    repo_path: &Path,
    now: DateTime<Utc>,
) -> Result<Project, HarnessError> {
    let canonical = repo_path.canonicalize()?;
    let mut state = store.load()?;
    if let Some(project) = state.projects.iter().find(|p| p.repo_path == canonical) {
        return Ok(project.clone());
    }
    let name = canonical.file_name().and_then(|n| n.to_str()).unwrap_or("project").to_string();
    let project = Project::new(name, canonical, now);
    state.projects.push(project.clone());
    store.save(&state)?;
    Ok(project)
}

/// Write a minimal placeholder handoff for `start --mode greenfield` when no
/// `--handoff-path` was given, so a brand-new run always has something for
/// the agent to read.
pub fn write_stub_handoff(project_name: &str, run_name: &str) -> Result<PathBuf, HarnessError> {
    let handoff = serde_json::json!({
        "meta": {
            "project": project_name,
            "phase": "bootstrap",
            "source": "harness start --mode greenfield",
            "lock": false,
        },
        "tasks": [{
            "id": "TASK-1",
            "category": "functional",
            "title": "Define the first task",
            "description": "Replace this placeholder with real scope before the agent runs.",
            "acceptance_criteria": ["Task reflects real, reviewed scope"],
            "passes": false,
        }],
    });
    let bytes = serde_json::to_vec_pretty(&handoff)
        .map_err(|e| HarnessError::SchemaError(format!("failed to serialize stub handoff: {e}")))?;
    let path = std::env::temp_dir().join(format!("harness-handoff-{run_name}.json"));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Build the takeover prompt for a mutating command: `--force` always wins,
/// an interactive terminal gets the real TTY prompt, otherwise a
/// non-interactive invocation never confirms (§4.E).
fn build_prompt(config: &Config, force: bool) -> Box<dyn TakeoverPrompt> {
    if force {
        Box::new(AlwaysConfirm)
    } else if config.interactive {
        Box::new(TtyTakeoverPrompt)
    } else {
        Box::new(NeverConfirm)
    }
}

/// Acquire the Controller Lease or fail with `LockHeld`/`LockInconsistent`.
/// Shared by every mutating command.
pub fn acquire_lease(
    config: &Config,
    event_log: &EventLog,
    now: DateTime<Utc>,
    force: bool,
) -> Result<ControllerLease, HarnessError> {
    let pid = std::process::id();
    let prompt = build_prompt(config, force);
    harness_lease::acquire(&config.home, event_log, pid, now, force, prompt.as_ref())?.into_controller()
}

/// Drain the Observer-mode inbox capture log into the registry and persist
/// it, the controller's side of the capture split (§5/§9). A no-op when
/// nothing has been captured since the last drain.
pub fn drain_inbox(config: &Config, store: &StateStore) -> Result<(), HarnessError> {
    let drained = config.inbox_log().drain()?;
    if drained.is_empty() {
        return Ok(());
    }
    let mut state: State = store.load()?;
    state.inbox.extend(drained);
    store.save(&state)
}
