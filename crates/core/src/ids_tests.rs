// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;

#[test]
fn project_ids_are_unique_v4_uuids() {
    let a = ProjectId::new();
    let b = ProjectId::new();
    assert_ne!(a, b);
    assert_eq!(a.0.get_version_num(), 4);
}

#[test]
fn run_id_roundtrips_through_display_and_parse() {
    let id = RunId::new();
    let parsed: RunId = id.to_string().parse().expect("valid uuid");
    assert_eq!(id, parsed);
}

#[test]
fn task_id_synthesis_is_one_indexed() {
    assert_eq!(TaskId::synthesize(1).as_str(), "TASK-1");
    assert_eq!(TaskId::synthesize(2).as_str(), "TASK-2");
}

#[test]
fn task_id_serializes_as_bare_string() {
    let id = TaskId::new("HUB-001");
    let json = serde_json::to_string(&id).expect("serialize");
    assert_eq!(json, "\"HUB-001\"");
}
