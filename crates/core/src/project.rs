// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Project: a registered Git repository the harness tracks runs against.

use crate::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub repo_path: PathBuf,
    pub status: ProjectStatus,
    pub last_touched_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, repo_path: PathBuf, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            repo_path,
            status: ProjectStatus::Active,
            last_touched_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_touched_at = now;
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
