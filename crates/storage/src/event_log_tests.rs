// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn append_then_read_all_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("events.log"));

    log.append(&Event::new(EventKind::SessionStarted, now()));
    log.append(&Event::new(EventKind::CommandPlan, now()).with_field("run_name", "feat-x"));

    let events = log.read_all().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::SessionStarted);
    assert_eq!(events[1].kind, EventKind::CommandPlan);
    assert_eq!(events[1].fields.get("run_name").unwrap(), "feat-x");
}

#[test]
fn read_all_on_missing_file_is_an_empty_vec_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("events.log"));
    assert!(log.read_all().unwrap().is_empty());
}

#[test]
fn append_never_truncates_prior_entries() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("events.log"));
    for _ in 0..5 {
        log.append(&Event::new(EventKind::StateUpdated, now()));
    }
    assert_eq!(log.read_all().unwrap().len(), 5);
}

#[test]
fn session_id_is_carried_when_set() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("events.log"));
    let session_id = harness_core::SessionId::new();
    log.append(&Event::new(EventKind::LockAcquired, now()).with_session(session_id));

    let events = log.read_all().unwrap();
    assert_eq!(events[0].session_id, Some(session_id));
}
