// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Run: one isolated unit of agent work, backed by a Git worktree and branch.

use crate::{ProjectId, RunId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Run lifecycle state.
///
/// `parked`/`missing` are terminal-until-reconciled: Git reality has
/// contradicted the registry and a human or the Reconciler must resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Created,
    Running,
    Finished,
    Parked,
    Missing,
}

impl RunState {
    pub fn is_terminal_until_reconciled(self) -> bool {
        matches!(self, RunState::Parked | RunState::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub run_name: String,
    pub project_id: ProjectId,
    pub worktree_path: PathBuf,
    pub branch_name: String,
    pub state: RunState,
    #[serde(default)]
    pub last_command: Option<String>,
    #[serde(default)]
    pub last_result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Run {
    /// Conventional branch name for a run: `run/<runName>`.
    pub fn branch_for(run_name: &str) -> String {
        format!("run/{run_name}")
    }

    pub fn new(
        run_name: impl Into<String>,
        project_id: ProjectId,
        worktree_path: PathBuf,
        now: DateTime<Utc>,
    ) -> Self {
        let run_name = run_name.into();
        let branch_name = Self::branch_for(&run_name);
        Self {
            id: RunId::new(),
            run_name,
            project_id,
            worktree_path,
            branch_name,
            state: RunState::Created,
            last_command: None,
            last_result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition(&mut self, state: RunState, now: DateTime<Utc>) {
        self.state = state;
        self.updated_at = now;
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
