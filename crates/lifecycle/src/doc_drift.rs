// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Doc-Drift Checker: flags undocumented CLI flags and public source
//! files, consults a per-project Decision Store to avoid re-flagging
//! resolved items, and gates `finish --doc-strict` (§4.I).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use harness_core::{DecisionKind, DocDecision, DriftItemId, HarnessError};
use harness_storage::DocDecisionStore;

/// What the user chose to do about one unresolved drift candidate.
#[derive(Debug, Clone)]
pub enum DocDriftDisposition {
    /// Docs were updated elsewhere; persist a permanent `documented` record.
    UpdateDocs { description: String },
    /// Accept the drift as permanent internal-only behavior.
    MarkInternal,
    /// Scope it out for the default defer window.
    Defer,
    /// Leave it unresolved this run; no decision is persisted.
    Continue,
}

/// Offers the four-option interactive resolution for one drift candidate.
/// The CLI supplies a real TTY-backed implementation; non-interactive
/// invocations use [`NeverResolve`].
pub trait DocDriftResolver {
    fn resolve(&self, item_id: &DriftItemId) -> Option<DocDriftDisposition>;
}

/// Never offers a resolution — every candidate stays unresolved. Used for
/// non-interactive invocations, per §4.I's "if the pass is non-interactive,
/// strict mode returns DocDrift" rule.
pub struct NeverResolve;

impl DocDriftResolver for NeverResolve {
    fn resolve(&self, _item_id: &DriftItemId) -> Option<DocDriftDisposition> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocDriftReport {
    pub unresolved: Vec<DriftItemId>,
}

impl DocDriftReport {
    /// Strict mode (§4.F's `finish --doc-strict`): any unresolved item
    /// aborts with `DocDrift`.
    pub fn into_strict_result(self) -> Result<(), HarnessError> {
        if self.unresolved.is_empty() {
            Ok(())
        } else {
            Err(HarnessError::DocDrift { count: self.unresolved.len() })
        }
    }
}

/// Scan `flags` and the public files directly under `project_root` for
/// mentions missing from `doc_files`/the agent guide, resolving each
/// candidate against the Decision Store (and, if offered, the resolver).
pub fn check_doc_drift(
    project_root: &Path,
    flags: &[String],
    doc_files: &[PathBuf],
    agent_guide: &Path,
    decisions: &DocDecisionStore,
    resolver: &dyn DocDriftResolver,
    now: DateTime<Utc>,
) -> Result<DocDriftReport, HarnessError> {
    let doc_contents: Vec<String> = doc_files
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap_or_default())
        .collect();
    let agent_guide_contents = std::fs::read_to_string(agent_guide).unwrap_or_default();

    let mut candidates: Vec<DriftItemId> = Vec::new();

    for flag in flags {
        let undocumented = doc_contents.iter().any(|content| !content.contains(flag.as_str()));
        if undocumented {
            candidates.push(DriftItemId::new(flag.clone()));
        }
    }

    for file_name in public_file_names(project_root)? {
        if !agent_guide_contents.contains(&file_name) {
            candidates.push(DriftItemId::new(file_name));
        }
    }

    let mut unresolved = Vec::new();
    for item_id in candidates {
        if is_skippable(decisions, &item_id, now)? {
            continue;
        }
        match resolver.resolve(&item_id) {
            Some(DocDriftDisposition::UpdateDocs { description }) => {
                decisions.record(DocDecision::new(
                    item_id,
                    DecisionKind::Documented,
                    Some(description),
                    now,
                ))?;
            }
            Some(DocDriftDisposition::MarkInternal) => {
                decisions.record(DocDecision::new(item_id, DecisionKind::Internal, None, now))?;
            }
            Some(DocDriftDisposition::Defer) => {
                decisions.record(DocDecision::new(item_id, DecisionKind::Deferred, None, now))?;
            }
            Some(DocDriftDisposition::Continue) | None => {
                unresolved.push(item_id);
            }
        }
    }

    Ok(DocDriftReport { unresolved })
}

/// True if an existing decision covers `item_id` and means it should not be
/// surfaced again: `internal` (permanent) or a still-unexpired `deferred`.
/// An expired `deferred` decision re-surfaces the item.
fn is_skippable(decisions: &DocDecisionStore, item_id: &DriftItemId, now: DateTime<Utc>) -> Result<bool, HarnessError> {
    let Some(decision) = decisions.find(item_id)? else {
        return Ok(false);
    };
    Ok(match decision.decision {
        DecisionKind::Internal | DecisionKind::Documented => true,
        DecisionKind::Deferred => !decision.is_expired(now),
    })
}

/// Names of files directly under `project_root` (non-recursive) that are
/// neither dotfiles nor prefixed `_`/`test_` — the "public surface" §4.I
/// requires a repository-map mention for.
fn public_file_names(project_root: &Path) -> Result<Vec<String>, HarnessError> {
    let mut names = Vec::new();
    let entries = match std::fs::read_dir(project_root) {
        Ok(entries) => entries,
        Err(_) => return Ok(names),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name.starts_with('_') || name.starts_with("test_") {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "doc_drift_tests.rs"]
mod tests;
