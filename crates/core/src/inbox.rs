// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Inbox: free-form observations captured from an agent session and queued
//! for a human to triage later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InboxItemId(pub Uuid);

impl InboxItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InboxItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InboxItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InboxItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Triage outcome for an [`InboxItem`]. Absent (`None` on the item) means
/// untriaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageStatus {
    Promoted,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: InboxItemId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage_status: Option<TriageStatus>,
}

impl InboxItem {
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: InboxItemId::new(),
            text: text.into(),
            created_at: now,
            triage_status: None,
        }
    }

    pub fn is_triaged(&self) -> bool {
        self.triage_status.is_some()
    }

    pub fn promote(&mut self) {
        self.triage_status = Some(TriageStatus::Promoted);
    }

    pub fn dismiss(&mut self) {
        self.triage_status = Some(TriageStatus::Dismissed);
    }
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
