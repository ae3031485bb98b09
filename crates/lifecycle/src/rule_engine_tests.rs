// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use crate::reconcile::ReconciledView;
use harness_core::{Category, Handoff, HandoffMeta, Project, ProjectStatus, Run, State, Task, TaskId};
use chrono::Utc;
use std::path::PathBuf;

fn task(id: &str, passes: bool) -> Task {
    Task {
        id: TaskId::new(id),
        category: Category::Functional,
        title: format!("do {id}"),
        description: "desc".to_string(),
        acceptance_criteria: vec!["criterion".to_string()],
        passes,
        files_expected: None,
        steps: None,
    }
}

fn handoff(tasks: Vec<Task>) -> Handoff {
    Handoff {
        meta: HandoffMeta { project: "p".to_string(), phase: String::new(), source: "test".to_string(), lock: false },
        tasks,
    }
}

fn project() -> Project {
    Project {
        id: Default::default(),
        name: "proj".to_string(),
        repo_path: PathBuf::from("/repo"),
        status: ProjectStatus::Active,
        last_touched_at: Utc::now(),
    }
}

fn run(project_id: harness_core::ProjectId, name: &str, state: RunState) -> Run {
    let mut r = Run::new(name, project_id, PathBuf::from(format!("/repo/runs/{name}")), Utc::now());
    r.state = state;
    r
}

fn view_of(state: State) -> ReconciledView {
    ReconciledView { state, drift: Vec::new(), refreshed_at: Utc::now() }
}

#[test]
fn finished_run_with_worktree_is_cleaned_first() {
    let project = project();
    let mut state = State::default();
    state.focus_project_id = Some(project.id);
    let r = run(project.id, "feat-x", RunState::Finished);
    let run_id = r.id;
    state.runs.push(r);
    state.projects.push(project);

    let view = view_of(state);
    let action = compute_next_action(&view, |id| if id == run_id { Some(handoff(vec![task("T-1", true)])) } else { None });
    assert_eq!(action.action, "clean feat-x");
}

#[test]
fn running_run_with_failing_task_continues_tests() {
    let project = project();
    let mut state = State::default();
    state.focus_project_id = Some(project.id);
    let r = run(project.id, "feat-x", RunState::Running);
    let run_id = r.id;
    state.runs.push(r);
    state.projects.push(project);

    let view = view_of(state);
    let action =
        compute_next_action(&view, |id| if id == run_id { Some(handoff(vec![task("T-1", false)])) } else { None });
    assert_eq!(action.action, "continue tests on feat-x");
}

#[test]
fn all_passing_and_clean_worktree_finishes() {
    let project = project();
    let mut state = State::default();
    state.focus_project_id = Some(project.id);
    let r = run(project.id, "feat-x", RunState::Running);
    let run_id = r.id;
    state.runs.push(r);
    state.projects.push(project);

    let view = view_of(state);
    let action =
        compute_next_action(&view, |id| if id == run_id { Some(handoff(vec![task("T-1", true)])) } else { None });
    assert_eq!(action.action, "finish feat-x");
}

#[test]
fn dirty_worktree_blocks_the_finish_rule() {
    let project = project();
    let project_id = project.id;
    let mut state = State::default();
    state.focus_project_id = Some(project_id);
    let r = run(project_id, "feat-x", RunState::Running);
    let run_id = r.id;
    state.runs.push(r);
    state.projects.push(project);

    let mut view = view_of(state);
    view.drift.push(Drift::DirtyTree { project_id });

    let action =
        compute_next_action(&view, |id| if id == run_id { Some(handoff(vec![task("T-1", true)])) } else { None });
    // Finish is blocked by the dirty tree, and there's no failing task either,
    // so the rule falls through to the focus-project fallback (rule 6).
    assert_eq!(action.action, "do T-1");
}

#[test]
fn no_focus_project_prompts_focus_set() {
    let state = State::default();
    let view = view_of(state);
    let action = compute_next_action(&view, |_| None);
    assert_eq!(action.action, "focus set <project>");
}

#[test]
fn focus_project_with_no_runs_prompts_start() {
    let project = project();
    let mut state = State::default();
    state.focus_project_id = Some(project.id);
    state.projects.push(project);

    let view = view_of(state);
    let action = compute_next_action(&view, |_| None);
    assert_eq!(action.action, "start <runName>");
}

#[test]
fn falls_back_to_first_failing_task_of_most_recent_active_run() {
    let project = project();
    let project_id = project.id;
    let mut state = State::default();
    state.focus_project_id = Some(project_id);
    let r = run(project_id, "feat-x", RunState::Created);
    let run_id = r.id;
    state.runs.push(r);
    state.projects.push(project);

    let view = view_of(state);
    let action = compute_next_action(&view, |id| {
        if id == run_id {
            Some(handoff(vec![task("T-1", true), task("T-2", false)]))
        } else {
            None
        }
    });
    assert_eq!(action.action, "do T-2");
}
