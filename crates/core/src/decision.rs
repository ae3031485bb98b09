// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Doc-drift decisions: a human's disposition of a detected documentation
//! gap, persisted per project so the checker doesn't re-flag it every run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The default window a `deferred` decision stays valid before it expires
/// and the drift it covers is eligible to be flagged again.
pub const DEFAULT_DEFER_DAYS: i64 = 7;

/// Identity of a drift candidate: a literal CLI flag (e.g. `--turbo`) or a
/// public source-file name, whichever the Doc-Drift Checker flagged.
///
/// Unlike [`crate::ProjectId`]/[`crate::RunId`], this is not a generated
/// UUID — it's the literal string the checker found, so the same drift is
/// recognized again on a later run without needing a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriftItemId(pub String);

impl DriftItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriftItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DriftItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DriftItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// The drift is real but scoped out; revisit after the defer window.
    Deferred,
    /// The drift is accepted as permanent internal-only behavior.
    Internal,
    /// The drift has been resolved by updating documentation elsewhere.
    Documented,
}

/// Computes whether and when a decision expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionExpiry;

impl DecisionExpiry {
    /// `deferred` decisions expire `DEFAULT_DEFER_DAYS` after `created_at`;
    /// `internal` and `documented` decisions never expire.
    pub fn for_kind(kind: DecisionKind, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match kind {
            DecisionKind::Deferred => Some(created_at + Duration::days(DEFAULT_DEFER_DAYS)),
            DecisionKind::Internal | DecisionKind::Documented => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocDecision {
    pub item_id: DriftItemId,
    pub decision: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl DocDecision {
    pub fn new(
        item_id: DriftItemId,
        decision: DecisionKind,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let expires_at = DecisionExpiry::for_kind(decision, created_at);
        Self {
            item_id,
            decision,
            description,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    /// Re-deferring an expired (or any) decision always produces a NEW
    /// record anchored at `now`, never mutates `self` in place — so an
    /// item's defer history stays a chain of distinct decisions.
    pub fn redefer(&self, now: DateTime<Utc>) -> Self {
        Self::new(self.item_id.clone(), DecisionKind::Deferred, self.description.clone(), now)
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
