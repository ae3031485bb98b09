// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Handoff data model: the task plan an agent consumes and partially mutates.
//!
//! Parsing and validation (the tagged modern/legacy forms, synthesized ids)
//! live in `harness-handoff`; this module only defines the shapes.

use crate::TaskId;
use serde::{Deserialize, Serialize};

/// Closed set of task categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Oidc,
    Roles,
    Infrastructure,
    Cli,
    Testing,
    Docs,
    Functional,
    Style,
    Api,
    Database,
    Auth,
    Ui,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub passes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_expected: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffMeta {
    pub project: String,
    #[serde(default)]
    pub phase: String,
    pub source: String,
    #[serde(default)]
    pub lock: bool,
}

impl HandoffMeta {
    /// Meta synthesized when reading the legacy bare-array form.
    pub fn legacy() -> Self {
        Self {
            project: "Unknown".to_string(),
            phase: String::new(),
            source: "legacy".to_string(),
            lock: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub meta: HandoffMeta,
    pub tasks: Vec<Task>,
}

impl Handoff {
    pub fn count_passing(&self) -> (usize, usize) {
        let passing = self.tasks.iter().filter(|t| t.passes).count();
        (passing, self.tasks.len())
    }

    pub fn all_pass(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.passes)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn first_failing(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.passes)
    }
}

#[cfg(test)]
#[path = "handoff_types_tests.rs"]
mod tests;
