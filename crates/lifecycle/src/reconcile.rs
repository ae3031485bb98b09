// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Reconciler: folds Git/filesystem reality into the registry's view,
//! classifying discrepancies as [`Drift`] rather than silently overwriting
//! or silently trusting either side (§4.G).

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use harness_core::{Clock, HarnessError, ProjectId, Run, RunId, RunState, State};
use harness_git::GitDriver;
use parking_lot::Mutex;

use crate::path_safety::MARKER_FILE_NAME;

/// How long a cached [`ReconciledView`] stays fresh before a read-only
/// command forces a new reconcile pass (§5).
pub const RECONCILE_CACHE_TTL: chrono::Duration = chrono::Duration::seconds(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    MissingWorktree { run_id: RunId },
    MarkerMissing { run_id: RunId },
    BranchChanged { run_id: RunId, actual: String },
    UnknownWorktree { path: PathBuf, branch: Option<String> },
    DirtyTree { project_id: ProjectId },
}

/// State folded with Git reality, plus the drift that folding surfaced.
///
/// Drift-driven transitions (e.g. `MissingWorktree` parking a Run) are
/// applied to `state` here but never persisted by the Reconciler itself —
/// only a caller that explicitly saves the registry makes them durable.
#[derive(Debug, Clone)]
pub struct ReconciledView {
    pub state: State,
    pub drift: Vec<Drift>,
    pub refreshed_at: DateTime<Utc>,
}

impl ReconciledView {
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty()
    }
}

struct CacheEntry {
    project_ids: Vec<ProjectId>,
    view: ReconciledView,
}

/// Computes and caches [`ReconciledView`]s. One instance is shared for the
/// lifetime of a single command invocation (or a `session`'s lifetime).
pub struct Reconciler<C: Clock> {
    clock: C,
    cache: Mutex<Option<CacheEntry>>,
}

impl<C: Clock> Reconciler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, cache: Mutex::new(None) }
    }

    /// Drop any cached view. Every mutating command calls this before
    /// acting, per §4.G.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    /// Return a fresh-enough view, recomputing only if the cache is absent,
    /// stale, or was built for a different project set.
    pub async fn reconcile(&self, state: &State) -> Result<ReconciledView, HarnessError> {
        let mut project_ids: Vec<ProjectId> = state.projects.iter().map(|p| p.id).collect();
        project_ids.sort_by_key(|id| id.to_string());

        {
            let cached = self.cache.lock();
            if let Some(entry) = cached.as_ref() {
                let now = self.clock.now();
                let fresh = now - entry.view.refreshed_at <= RECONCILE_CACHE_TTL;
                if fresh && entry.project_ids == project_ids {
                    return Ok(entry.view.clone());
                }
            }
        }

        let view = self.compute(state).await?;
        *self.cache.lock() = Some(CacheEntry { project_ids, view: view.clone() });
        Ok(view)
    }

    async fn compute(&self, state: &State) -> Result<ReconciledView, HarnessError> {
        let now = self.clock.now();
        let mut next_state = state.clone();
        let mut drift = Vec::new();

        for project in &state.projects {
            let driver = GitDriver::new(&project.repo_path);
            let worktrees = driver.worktree_list().await?;
            let reported_paths: HashSet<PathBuf> = worktrees
                .iter()
                .filter_map(|w| w.path.canonicalize().ok())
                .collect();

            for run in state.runs_for_project(project.id) {
                reconcile_run(run, &worktrees, &reported_paths, &mut next_state, &mut drift, now);
            }

            let known_run_paths: HashSet<PathBuf> = state
                .runs_for_project(project.id)
                .filter_map(|r| r.worktree_path.canonicalize().ok())
                .collect();
            for worktree in &worktrees {
                let Ok(canonical) = worktree.path.canonicalize() else { continue };
                if canonical == project.repo_path.canonicalize().unwrap_or_default() {
                    continue; // the repo's own primary worktree, not a run
                }
                if !known_run_paths.contains(&canonical) {
                    drift.push(Drift::UnknownWorktree {
                        path: canonical,
                        branch: worktree.branch.clone(),
                    });
                }
            }

            if state.focus_project_id == Some(project.id) {
                let status = driver.status(&project.repo_path).await?;
                if !status.clean {
                    drift.push(Drift::DirtyTree { project_id: project.id });
                }
            }
        }

        Ok(ReconciledView { state: next_state, drift, refreshed_at: now })
    }
}

fn reconcile_run(
    run: &Run,
    worktrees: &[harness_git::WorktreeEntry],
    reported_paths: &HashSet<PathBuf>,
    next_state: &mut State,
    drift: &mut Vec<Drift>,
    now: DateTime<Utc>,
) {
    let canonical_run_path = run.worktree_path.canonicalize().ok();

    let reported = canonical_run_path.as_ref().and_then(|p| {
        if reported_paths.contains(p) {
            worktrees.iter().find(|w| w.path.canonicalize().ok().as_ref() == Some(p))
        } else {
            None
        }
    });

    match reported {
        None => {
            drift.push(Drift::MissingWorktree { run_id: run.id });
            if let Some(r) = next_state.run_mut(run.id) {
                r.transition(RunState::Parked, now);
            }
        }
        Some(entry) => {
            if !run.worktree_path.join(MARKER_FILE_NAME).is_file() {
                drift.push(Drift::MarkerMissing { run_id: run.id });
            }
            if let Some(actual_branch) = &entry.branch {
                if actual_branch != &run.branch_name {
                    drift.push(Drift::BranchChanged { run_id: run.id, actual: actual_branch.clone() });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
