// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use chrono::Duration;

fn setup() -> (tempfile::TempDir, PathBuf, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let project_root = dir.path().join("repo");
    std::fs::create_dir_all(&project_root).unwrap();
    let readme = project_root.join("README.md");
    let agent_guide = project_root.join("AGENTS.md");
    std::fs::write(&readme, "# readme\n").unwrap();
    std::fs::write(&agent_guide, "# agent guide\n").unwrap();
    (dir, project_root, readme, agent_guide)
}

#[test]
fn undocumented_flag_with_empty_decision_store_is_unresolved() {
    let (_dir, project_root, readme, agent_guide) = setup();
    let decisions = DocDecisionStore::new(&project_root);

    let report = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme],
        &agent_guide,
        &decisions,
        &NeverResolve,
        Utc::now(),
    )
    .unwrap();

    assert_eq!(report.unresolved, vec![DriftItemId::new("--turbo")]);
    assert!(report.into_strict_result().is_err());
}

#[test]
fn flag_documented_in_every_tracked_file_is_not_flagged() {
    let (_dir, project_root, readme, agent_guide) = setup();
    std::fs::write(&readme, "# readme\nUse --turbo to speed things up.\n").unwrap();
    let decisions = DocDecisionStore::new(&project_root);

    let report = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme],
        &agent_guide,
        &decisions,
        &NeverResolve,
        Utc::now(),
    )
    .unwrap();

    assert!(report.unresolved.is_empty());
    assert!(report.into_strict_result().is_ok());
}

#[test]
fn internal_decision_permanently_skips_the_flag() {
    let (_dir, project_root, readme, agent_guide) = setup();
    let decisions = DocDecisionStore::new(&project_root);
    let now = Utc::now();
    decisions
        .record(DocDecision::new(DriftItemId::new("--turbo"), DecisionKind::Internal, None, now))
        .unwrap();

    let report = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme],
        &agent_guide,
        &decisions,
        &NeverResolve,
        now + Duration::days(365),
    )
    .unwrap();

    assert!(report.unresolved.is_empty());
}

#[test]
fn expired_deferred_decision_resurfaces() {
    let (_dir, project_root, readme, agent_guide) = setup();
    let decisions = DocDecisionStore::new(&project_root);
    let created_at = Utc::now();
    decisions
        .record(DocDecision::new(DriftItemId::new("--turbo"), DecisionKind::Deferred, None, created_at))
        .unwrap();

    let still_fresh = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme.clone()],
        &agent_guide,
        &decisions,
        &NeverResolve,
        created_at + Duration::days(1),
    )
    .unwrap();
    assert!(still_fresh.unresolved.is_empty(), "still within the defer window");

    let expired = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme],
        &agent_guide,
        &decisions,
        &NeverResolve,
        created_at + Duration::days(8),
    )
    .unwrap();
    assert_eq!(expired.unresolved, vec![DriftItemId::new("--turbo")]);
}

#[test]
fn resolver_marking_internal_persists_a_decision() {
    let (_dir, project_root, readme, agent_guide) = setup();
    let decisions = DocDecisionStore::new(&project_root);

    struct AlwaysInternal;
    impl DocDriftResolver for AlwaysInternal {
        fn resolve(&self, _item_id: &DriftItemId) -> Option<DocDriftDisposition> {
            Some(DocDriftDisposition::MarkInternal)
        }
    }

    let report = check_doc_drift(
        &project_root,
        &["--turbo".to_string()],
        &[readme],
        &agent_guide,
        &decisions,
        &AlwaysInternal,
        Utc::now(),
    )
    .unwrap();

    assert!(report.unresolved.is_empty());
    let persisted = decisions.find(&DriftItemId::new("--turbo")).unwrap().unwrap();
    assert_eq!(persisted.decision, DecisionKind::Internal);
}

#[test]
fn public_file_missing_from_agent_guide_is_unresolved() {
    let (_dir, project_root, readme, agent_guide) = setup();
    std::fs::write(project_root.join("lib.rs"), "fn main() {}\n").unwrap();
    std::fs::write(project_root.join("_internal.rs"), "fn helper() {}\n").unwrap();
    let decisions = DocDecisionStore::new(&project_root);

    let report = check_doc_drift(&project_root, &[], &[readme], &agent_guide, &decisions, &NeverResolve, Utc::now())
        .unwrap();

    assert_eq!(report.unresolved, vec![DriftItemId::new("lib.rs")]);
}

#[test]
fn public_file_mentioned_in_agent_guide_is_not_flagged() {
    let (_dir, project_root, readme, agent_guide) = setup();
    std::fs::write(project_root.join("lib.rs"), "fn main() {}\n").unwrap();
    std::fs::write(&agent_guide, "# agent guide\n## repository map\n- lib.rs: entry point\n").unwrap();
    let decisions = DocDecisionStore::new(&project_root);

    let report = check_doc_drift(&project_root, &[], &[readme], &agent_guide, &decisions, &NeverResolve, Utc::now())
        .unwrap();

    assert!(report.unresolved.is_empty());
}
