// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Append-only, line-delimited JSON audit trail of lifecycle and lock events.
//!
//! Writes are best-effort: a failed append is logged as a warning but never
//! aborts the command that triggered it. The log is never truncated
//! automatically.

use chrono::{DateTime, Utc};
use harness_core::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Event kinds. The spec names a minimum set; this enum is open to more as
/// components need them (e.g. `StateRepaired` below), which the `{ ts, kind,
/// sessionId?, fields… }` line shape accommodates without a schema bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SessionStarted,
    SessionEnded,
    LockAcquired,
    LockDenied,
    LockReleased,
    LockStaleTakeover,
    ReconcileStart,
    ReconcileResult,
    CommandPlan,
    CommandExecute,
    CommandVerifyOk,
    CommandVerifyFail,
    StateUpdated,
    StateRepaired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Event {
    pub fn new(kind: EventKind, now: DateTime<Utc>) -> Self {
        Self { ts: now, kind, session_id: None, fields: Map::new() }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

/// Append-only event log at a well-known path (`~/.cloud-harness/events.log`).
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one JSON line. Never fails the caller: an I/O error is logged
    /// as a warning and swallowed, per §4.D.
    pub fn append(&self, event: &Event) {
        if let Err(err) = self.try_append(event) {
            tracing::warn!(error = %err, kind = ?event.kind, "failed to append event log entry");
        }
    }

    fn try_append(&self, event: &Event) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(event)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(file, "{line}")
    }

    /// Read every event currently in the log, in append order. Used by
    /// tests and by `status`/`doctor` to render recent history; not on any
    /// hot path.
    pub fn read_all(&self) -> std::io::Result<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
