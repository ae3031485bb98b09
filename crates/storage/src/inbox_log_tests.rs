// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use chrono::Utc;

#[test]
fn drain_on_missing_log_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = InboxCaptureLog::new(dir.path().join("inbox.log"));
    assert!(log.drain().unwrap().is_empty());
}

#[test]
fn capture_then_drain_returns_items_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = InboxCaptureLog::new(dir.path().join("inbox.log"));

    log.capture(&InboxItem::new("first", Utc::now())).unwrap();
    log.capture(&InboxItem::new("second", Utc::now())).unwrap();

    let drained = log.drain().unwrap();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].text, "first");
    assert_eq!(drained[1].text, "second");
}

#[test]
fn drain_leaves_the_log_empty_for_future_captures() {
    let dir = tempfile::tempdir().unwrap();
    let log = InboxCaptureLog::new(dir.path().join("inbox.log"));
    log.capture(&InboxItem::new("first", Utc::now())).unwrap();
    log.drain().unwrap();

    assert!(log.drain().unwrap().is_empty());

    log.capture(&InboxItem::new("second", Utc::now())).unwrap();
    let drained = log.drain().unwrap();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].text, "second");
}

#[test]
fn capture_requires_no_lease_and_never_touches_state_json() {
    let dir = tempfile::tempdir().unwrap();
    let log = InboxCaptureLog::new(dir.path().join("inbox.log"));
    log.capture(&InboxItem::new("note", Utc::now())).unwrap();
    assert!(!dir.path().join("state.json").exists());
}
