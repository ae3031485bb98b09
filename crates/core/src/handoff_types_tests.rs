// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use crate::TaskId;

fn task(id: &str, passes: bool) -> Task {
    Task {
        id: TaskId::from(id),
        category: Category::Functional,
        title: "do thing".to_string(),
        description: "desc".to_string(),
        acceptance_criteria: vec!["it works".to_string()],
        passes,
        files_expected: None,
        steps: None,
    }
}

fn handoff(tasks: Vec<Task>) -> Handoff {
    Handoff {
        meta: HandoffMeta {
            project: "demo".to_string(),
            phase: "1".to_string(),
            source: "manual".to_string(),
            lock: false,
        },
        tasks,
    }
}

#[test]
fn count_passing_tracks_both_totals() {
    let h = handoff(vec![task("TASK-1", true), task("TASK-2", false)]);
    assert_eq!(h.count_passing(), (1, 2));
}

#[test]
fn all_pass_is_false_when_empty() {
    let h = handoff(vec![]);
    assert!(!h.all_pass());
}

#[test]
fn all_pass_requires_every_task_passing() {
    let h = handoff(vec![task("TASK-1", true), task("TASK-2", true)]);
    assert!(h.all_pass());
}

#[test]
fn first_failing_returns_first_unmet_task_in_order() {
    let h = handoff(vec![task("TASK-1", true), task("TASK-2", false), task("TASK-3", false)]);
    assert_eq!(h.first_failing().unwrap().id, TaskId::from("TASK-2"));
}

#[test]
fn legacy_meta_marks_source_as_legacy() {
    let meta = HandoffMeta::legacy();
    assert_eq!(meta.source, "legacy");
    assert!(!meta.lock);
}

#[test]
fn category_serializes_snake_case() {
    let json = serde_json::to_string(&Category::Infrastructure).expect("serialize");
    assert_eq!(json, "\"infrastructure\"");
}
