// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

use super::*;
use chrono::{Duration, TimeZone};

fn t(y: i32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, 1, 1, h, 0, 0).unwrap()
}

#[test]
fn heartbeat_is_fresh_right_after_writing() {
    let hb = HeartbeatFile::new(SessionId::new(), t(2026, 0));
    assert!(!hb.is_stale(t(2026, 0), Duration::seconds(30)));
}

#[test]
fn heartbeat_goes_stale_past_max_age() {
    let hb = HeartbeatFile::new(SessionId::new(), t(2026, 0));
    assert!(hb.is_stale(t(2026, 1), Duration::seconds(30)));
}

#[test]
fn session_id_roundtrips_through_display_and_parse() {
    let id = SessionId::new();
    let parsed: SessionId = id.to_string().parse().expect("parse");
    assert_eq!(id, parsed);
}

#[test]
fn lock_file_serializes_with_session_id_as_bare_string() {
    let lock = LockFile::new(1234, SessionId::new(), t(2026, 0));
    let json = serde_json::to_value(&lock).expect("serialize");
    assert!(json["session_id"].is_string());
    assert_eq!(json["pid"], 1234);
}
