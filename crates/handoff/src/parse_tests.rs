// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;

fn modern_doc() -> &'static str {
    r#"{
        "meta": {"project": "demo", "phase": "1", "source": "manual", "lock": false},
        "tasks": [
            {
                "id": "HUB-001",
                "category": "functional",
                "title": "do a thing",
                "description": "desc",
                "acceptance_criteria": ["it works"],
                "passes": false
            }
        ]
    }"#
}

#[test]
fn parses_modern_form() {
    let h = parse(modern_doc().as_bytes()).unwrap();
    assert_eq!(h.meta.project, "demo");
    assert_eq!(h.meta.source, "manual");
    assert_eq!(h.tasks.len(), 1);
    assert_eq!(h.tasks[0].id.as_str(), "HUB-001");
}

#[test]
fn parses_legacy_array_form_and_synthesizes_meta() {
    let doc = r#"[
        {
            "category": "security",
            "title": "lock it down",
            "description": "desc",
            "acceptance_criteria": ["no leaks"],
            "passes": true
        }
    ]"#;
    let h = parse(doc.as_bytes()).unwrap();
    assert_eq!(h.meta.project, "Unknown");
    assert_eq!(h.meta.source, "legacy");
    assert!(!h.meta.lock);
    assert_eq!(h.tasks[0].id.as_str(), "TASK-1");
}

#[test]
fn synthesizes_id_when_absent_using_one_based_position() {
    let doc = r#"{
        "meta": {"project": "demo", "source": "manual"},
        "tasks": [
            {"category": "cli", "title": "a", "description": "d", "acceptance_criteria": ["x"], "passes": false},
            {"category": "cli", "title": "b", "description": "d", "acceptance_criteria": ["x"], "passes": false}
        ]
    }"#;
    let h = parse(doc.as_bytes()).unwrap();
    assert_eq!(h.tasks[0].id.as_str(), "TASK-1");
    assert_eq!(h.tasks[1].id.as_str(), "TASK-2");
}

#[test]
fn rejects_invalid_json() {
    let err = parse(b"not json").unwrap_err();
    assert!(matches!(err, HarnessError::SchemaError(_)));
}

#[test]
fn rejects_empty_tasks() {
    let doc = r#"{"meta": {"project": "demo", "source": "manual"}, "tasks": []}"#;
    let err = parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, HarnessError::SchemaError(_)));
}

#[test]
fn rejects_category_outside_closed_set() {
    let doc = r#"{
        "meta": {"project": "demo", "source": "manual"},
        "tasks": [
            {"category": "not_a_category", "title": "a", "description": "d", "acceptance_criteria": ["x"], "passes": false}
        ]
    }"#;
    let err = parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, HarnessError::SchemaError(_)));
}

#[test]
fn rejects_non_strict_boolean_passes() {
    let doc = r#"{
        "meta": {"project": "demo", "source": "manual"},
        "tasks": [
            {"category": "cli", "title": "a", "description": "d", "acceptance_criteria": ["x"], "passes": "true"}
        ]
    }"#;
    let err = parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, HarnessError::SchemaError(_)));
}

#[test]
fn rejects_empty_acceptance_criteria() {
    let doc = r#"{
        "meta": {"project": "demo", "source": "manual"},
        "tasks": [
            {"category": "cli", "title": "a", "description": "d", "acceptance_criteria": [], "passes": false}
        ]
    }"#;
    let err = parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, HarnessError::SchemaError(_)));
}

#[test]
fn accepts_optional_files_expected_and_steps() {
    let doc = r#"{
        "meta": {"project": "demo", "source": "manual"},
        "tasks": [
            {
                "category": "cli", "title": "a", "description": "d",
                "acceptance_criteria": ["x"], "passes": false,
                "files_expected": ["src/main.rs"], "steps": ["build", "run"]
            }
        ]
    }"#;
    let h = parse(doc.as_bytes()).unwrap();
    assert_eq!(h.tasks[0].files_expected.as_deref(), Some(&["src/main.rs".to_string()][..]));
    assert_eq!(h.tasks[0].steps.as_deref(), Some(&["build".to_string(), "run".to_string()][..]));
}
