// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Parsing and validation of the handoff document.
//!
//! Two input forms are accepted on read: a modern object (`{meta, tasks}`)
//! and a legacy bare array of tasks. This is modeled as a tagged-variant
//! deserialization target (`RawHandoff`) rather than runtime type sniffing —
//! serde picks the right variant from the JSON shape itself.

use harness_core::{Category, Handoff, HandoffMeta, HarnessError, Task, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// The two accepted shapes of a handoff document on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHandoff {
    Modern { meta: RawMeta, tasks: Vec<RawTask> },
    Legacy(Vec<RawTask>),
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    project: String,
    #[serde(default)]
    phase: String,
    source: String,
    #[serde(default)]
    lock: bool,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(default)]
    id: Option<String>,
    category: Value,
    title: String,
    description: String,
    acceptance_criteria: Vec<String>,
    passes: Value,
    #[serde(default)]
    files_expected: Option<Vec<String>>,
    #[serde(default)]
    steps: Option<Vec<String>>,
}

/// Parse and validate a handoff document.
///
/// Validation order follows the schema exactly: valid JSON, then root shape,
/// then non-empty `tasks`, then per-task field checks.
pub fn parse(bytes: &[u8]) -> Result<Handoff, HarnessError> {
    let raw: RawHandoff = serde_json::from_slice(bytes)
        .map_err(|e| HarnessError::SchemaError(format!("invalid JSON: {e}")))?;

    let (meta, raw_tasks) = match raw {
        RawHandoff::Modern { meta, tasks } => (
            HandoffMeta {
                project: meta.project,
                phase: meta.phase,
                source: meta.source,
                lock: meta.lock,
            },
            tasks,
        ),
        RawHandoff::Legacy(tasks) => (HandoffMeta::legacy(), tasks),
    };

    if raw_tasks.is_empty() {
        return Err(HarnessError::SchemaError("tasks must be a non-empty list".to_string()));
    }

    let tasks = raw_tasks
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_task(raw, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Handoff { meta, tasks })
}

fn validate_task(raw: RawTask, position: usize) -> Result<Task, HarnessError> {
    let id = match raw.id {
        Some(id) if !id.is_empty() => TaskId::new(id),
        _ => TaskId::synthesize(position),
    };

    let category: Category = serde_json::from_value(raw.category.clone()).map_err(|_| {
        HarnessError::SchemaError(format!(
            "task {id}: category {} is not one of the closed set",
            raw.category
        ))
    })?;

    let passes = raw.passes.as_bool().ok_or_else(|| {
        HarnessError::SchemaError(format!("task {id}: passes must be a strict boolean"))
    })?;

    if raw.acceptance_criteria.is_empty() {
        return Err(HarnessError::SchemaError(format!(
            "task {id}: acceptance_criteria must be a non-empty list"
        )));
    }

    Ok(Task {
        id,
        category,
        title: raw.title,
        description: raw.description,
        acceptance_criteria: raw.acceptance_criteria,
        passes,
        files_expected: raw.files_expected,
        steps: raw.steps,
    })
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
