// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Rule Engine: a pure function from a [`ReconciledView`] to the single
//! next action a user should take (§4.H). Never mutates anything.

use harness_core::{Handoff, RunState};

use crate::reconcile::{Drift, ReconciledView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextAction {
    pub action: String,
    pub why: String,
    pub done: String,
}

impl NextAction {
    fn new(action: impl Into<String>, why: impl Into<String>, done: impl Into<String>) -> Self {
        Self { action: action.into(), why: why.into(), done: done.into() }
    }
}

/// Decide the single next action for the user, given a reconciled view and
/// the handoffs for any runs the view mentions (keyed by run id, loaded by
/// the caller since handoffs live on disk, not in the registry).
///
/// Priority order, first match wins (§4.H).
pub fn compute_next_action(
    view: &ReconciledView,
    handoff_for_run: impl Fn(harness_core::RunId) -> Option<Handoff>,
) -> NextAction {
    // 1. A finished run that still has a worktree -> clean.
    if let Some(run) = view.state.runs.iter().find(|r| {
        r.state == RunState::Finished
            && !view.drift.iter().any(|d| matches!(d, Drift::MissingWorktree { run_id } if *run_id == r.id))
    }) {
        return NextAction::new(
            format!("clean {}", run.run_name),
            "run finished and its worktree is still present",
            "worktree and branch removed, run dropped from the registry",
        );
    }

    // 2. A running run whose handoff has any failing task -> continue tests.
    for run in view.state.runs.iter().filter(|r| r.state == RunState::Running) {
        if let Some(handoff) = handoff_for_run(run.id) {
            if handoff.first_failing().is_some() {
                return NextAction::new(
                    format!("continue tests on {}", run.run_name),
                    "run is in progress with at least one failing task",
                    "every task in the handoff has passes=true",
                );
            }
        }
    }

    // 3. A run whose handoff is all-passing and whose worktree is clean -> finish.
    for run in view.state.runs.iter().filter(|r| r.state == RunState::Created || r.state == RunState::Running) {
        let worktree_dirty = view
            .drift
            .iter()
            .any(|d| matches!(d, Drift::DirtyTree { project_id } if *project_id == run.project_id));
        if worktree_dirty {
            continue;
        }
        if let Some(handoff) = handoff_for_run(run.id) {
            if handoff.all_pass() {
                return NextAction::new(
                    format!("finish {}", run.run_name),
                    "every task passes and the worktree is clean",
                    "branch pushed to origin and the run marked finished",
                );
            }
        }
    }

    // 4. No focus project -> focus set.
    let Some(focus) = view.state.focus_project() else {
        return NextAction::new(
            "focus set <project>",
            "no project is currently focused",
            "a focus project is recorded in the registry",
        );
    };

    // 5. Focus project has no runs -> start a new run.
    let mut focus_runs: Vec<_> = view.state.runs_for_project(focus.id).collect();
    if focus_runs.is_empty() {
        return NextAction::new(
            "start <runName>",
            format!("{} has no runs yet", focus.name),
            "a worktree and branch exist for the new run",
        );
    }

    // 6. Otherwise: the first task of the focus project's most recent active run.
    focus_runs.sort_by_key(|r| r.created_at);
    let most_recent = focus_runs
        .iter()
        .rev()
        .find(|r| !r.state.is_terminal_until_reconciled())
        .copied()
        .unwrap_or(focus_runs[focus_runs.len() - 1]);

    if let Some(handoff) = handoff_for_run(most_recent.id) {
        if let Some(task) = handoff.first_failing().or_else(|| handoff.tasks.first()) {
            return NextAction::new(
                task.title.clone(),
                format!("next task in {}", most_recent.run_name),
                "the task's acceptance criteria are met and passes=true",
            );
        }
    }

    NextAction::new(
        format!("inspect {}", most_recent.run_name),
        "no handoff is readable for the focus project's most recent run",
        "the run's handoff parses and lists at least one task",
    )
}

#[cfg(test)]
#[path = "rule_engine_tests.rs"]
mod tests;
