// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The registry: the full durable content of `state.json` — every Project,
//! Run, and Inbox item the harness knows about, plus which project is
//! focused. Persistence (atomic load/save, crash recovery) lives in
//! `harness-storage`; this module only defines the shape.

use crate::{InboxItem, InboxItemId, Project, ProjectId, Run, RunId};
use serde::{Deserialize, Serialize};

/// The full content of the registry file.
///
/// An empty `State` (no projects, no runs, no inbox items, no focus) is a
/// valid, non-error value — it's what `load()` returns when `state.json`
/// doesn't exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default)]
    pub inbox: Vec<InboxItem>,
    #[serde(default)]
    pub focus_project_id: Option<ProjectId>,
}

impl State {
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Look up a project by UUID string or exact name, the two forms the
    /// `focus set <id|name>` command surface accepts.
    pub fn project_by_id_or_name(&self, needle: &str) -> Option<&Project> {
        if let Ok(id) = needle.parse::<ProjectId>() {
            if let Some(p) = self.project(id) {
                return Some(p);
            }
        }
        self.projects.iter().find(|p| p.name == needle)
    }

    pub fn focus_project(&self) -> Option<&Project> {
        self.focus_project_id.and_then(|id| self.project(id))
    }

    pub fn run(&self, id: RunId) -> Option<&Run> {
        self.runs.iter().find(|r| r.id == id)
    }

    pub fn run_mut(&mut self, id: RunId) -> Option<&mut Run> {
        self.runs.iter_mut().find(|r| r.id == id)
    }

    pub fn run_by_name(&self, project_id: ProjectId, run_name: &str) -> Option<&Run> {
        self.runs
            .iter()
            .find(|r| r.project_id == project_id && r.run_name == run_name)
    }

    pub fn runs_for_project(&self, project_id: ProjectId) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(move |r| r.project_id == project_id)
    }

    pub fn remove_run(&mut self, id: RunId) {
        self.runs.retain(|r| r.id != id);
    }

    pub fn inbox_item(&self, id: InboxItemId) -> Option<&InboxItem> {
        self.inbox.iter().find(|i| i.id == id)
    }

    pub fn inbox_item_mut(&mut self, id: InboxItemId) -> Option<&mut InboxItem> {
        self.inbox.iter_mut().find(|i| i.id == id)
    }

    pub fn untriaged_inbox(&self) -> impl Iterator<Item = &InboxItem> {
        self.inbox.iter().filter(|i| !i.is_triaged())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
