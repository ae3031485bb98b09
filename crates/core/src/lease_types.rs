// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Lease data shapes: the on-disk lock and heartbeat records one controller
//! session uses to claim single-writer ownership of the registry.
//!
//! Acquisition, takeover, and the background heartbeat loop live in
//! `harness-lease`; this module only defines the persisted shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of one controller session holding (or having held) the lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The lock file: who holds the lease and since when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    pub pid: u32,
    pub session_id: SessionId,
    pub acquired_at: DateTime<Utc>,
}

impl LockFile {
    pub fn new(pid: u32, session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            pid,
            session_id,
            acquired_at: now,
        }
    }
}

/// The heartbeat file: proof of life for the session currently named in
/// [`LockFile::session_id`]. Written periodically by a background task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatFile {
    pub session_id: SessionId,
    pub last_beat_at: DateTime<Utc>,
}

impl HeartbeatFile {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            last_beat_at: now,
        }
    }

    /// A heartbeat is stale once it's older than `max_age`, meaning the
    /// holder is presumed dead regardless of what the lock file claims.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now - self.last_beat_at > max_age
    }
}

#[cfg(test)]
#[path = "lease_types_tests.rs"]
mod tests;
