// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Arbitrary strategies for the data model, gated behind `test-support` so
//! downstream crates can write property tests (§8) without dragging
//! `proptest` into non-test dependency graphs.

use crate::{Category, Handoff, HandoffMeta, Project, ProjectId, ProjectStatus, Run, RunState, Task, TaskId};
use chrono::{DateTime, Utc};
use proptest::collection::vec;
use proptest::prelude::*;
use std::path::PathBuf;

/// A fixed instant, arbitrary but deterministic, so strategies don't need
/// `Utc::now()` (which would make shrinking and replay non-reproducible).
///
/// Generated as seconds-since-epoch over a range (2020..2030) comfortably
/// inside chrono's representable span, so every sample is a valid instant.
pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    const SECS_2020: i64 = 1_577_836_800;
    const SECS_2030: i64 = 1_893_456_000;
    (SECS_2020..SECS_2030).prop_filter_map("valid unix timestamp", |secs| {
        DateTime::<Utc>::from_timestamp(secs, 0)
    })
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

pub fn arb_project_status() -> impl Strategy<Value = ProjectStatus> {
    prop_oneof![Just(ProjectStatus::Active), Just(ProjectStatus::Archived)]
}

pub fn arb_project() -> impl Strategy<Value = Project> {
    (arb_identifier(), arb_project_status(), arb_timestamp()).prop_map(|(name, status, ts)| {
        let repo_path = PathBuf::from(format!("/repos/{name}"));
        Project { id: ProjectId::new(), name, repo_path, status, last_touched_at: ts }
    })
}

pub fn arb_run_state() -> impl Strategy<Value = RunState> {
    prop_oneof![
        Just(RunState::Created),
        Just(RunState::Running),
        Just(RunState::Finished),
        Just(RunState::Parked),
        Just(RunState::Missing),
    ]
}

/// A Run tied to a given project id, so generated States stay referentially
/// sane (no orphaned `project_id`).
pub fn arb_run_for(project_id: ProjectId) -> impl Strategy<Value = Run> {
    (arb_identifier(), arb_run_state(), arb_timestamp(), arb_timestamp()).prop_map(
        move |(run_name, state, created_at, updated_at)| {
            let worktree_path = PathBuf::from(format!("/repos/runs/{run_name}"));
            let branch_name = Run::branch_for(&run_name);
            Run {
                id: crate::RunId::new(),
                run_name,
                project_id,
                worktree_path,
                branch_name,
                state,
                last_command: None,
                last_result: None,
                created_at,
                updated_at,
            }
        },
    )
}

pub fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Security),
        Just(Category::Oidc),
        Just(Category::Roles),
        Just(Category::Infrastructure),
        Just(Category::Cli),
        Just(Category::Testing),
        Just(Category::Docs),
        Just(Category::Functional),
        Just(Category::Style),
        Just(Category::Api),
        Just(Category::Database),
        Just(Category::Auth),
        Just(Category::Ui),
    ]
}

pub fn arb_task() -> impl Strategy<Value = Task> {
    (
        arb_identifier(),
        arb_category(),
        ".{1,40}",
        ".{1,80}",
        vec(".{1,30}", 1..4),
        any::<bool>(),
    )
        .prop_map(|(id, category, title, description, acceptance_criteria, passes)| Task {
            id: TaskId::from(id),
            category,
            title,
            description,
            acceptance_criteria,
            passes,
            files_expected: None,
            steps: None,
        })
}

/// A handoff with at least one task, the invariant §4.B's validator enforces.
pub fn arb_handoff() -> impl Strategy<Value = Handoff> {
    (arb_identifier(), vec(arb_task(), 1..6)).prop_map(|(project, tasks)| Handoff {
        meta: HandoffMeta { project, phase: String::new(), source: "test".to_string(), lock: false },
        tasks,
    })
}
