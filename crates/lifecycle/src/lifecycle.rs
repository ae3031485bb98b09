// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Run Lifecycle Engine: start/run/finish/clean, each following
//! Plan -> Execute -> Verify -> Commit (§4.F). Every mutation logs its plan
//! before acting and its verification result before touching the registry,
//! so a crash mid-operation never leaves a half-applied registry change.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harness_core::{Clock, Handoff, HarnessError, Project, Run, RunId, RunState, SessionId};
use harness_git::GitDriver;
use harness_storage::{Event, EventKind, EventLog, StateStore};

use crate::doc_drift::DocDriftReport;
use crate::path_safety::{check_worktree_path_safety, MARKER_FILE_NAME};

/// Spawns the external agent process and waits for it to exit.
///
/// Constructed only inside the `run` command's handler, never linked into
/// `help`/`list`/`status`/`next`/`clean` (§4.F, §9).
#[async_trait]
pub trait AgentLauncher: Send + Sync {
    async fn launch(&self, worktree: &Path, handoff_path: &Path) -> Result<ExitStatus, HarnessError>;
}

/// Launches the agent binary named by `command` as a real child process
/// with its working directory set to the worktree.
pub struct ProcessAgentLauncher {
    pub command: String,
}

#[async_trait]
impl AgentLauncher for ProcessAgentLauncher {
    async fn launch(&self, worktree: &Path, handoff_path: &Path) -> Result<ExitStatus, HarnessError> {
        let status = tokio::process::Command::new(&self.command)
            .arg("--handoff")
            .arg(handoff_path)
            .current_dir(worktree)
            .status()
            .await?;
        Ok(status)
    }
}

async fn check_clean(path: &Path) -> Result<(), HarnessError> {
    let driver = GitDriver::new(path);
    let report = driver.status(path).await?;
    if !report.clean {
        return Err(HarnessError::DirtyTree { path: path.to_path_buf() });
    }
    Ok(())
}

pub struct LifecycleEngine<C: Clock> {
    clock: C,
}

impl<C: Clock> LifecycleEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// **start**: create `run/<runName>` from `HEAD`, add a worktree, drop
    /// the marker, copy the handoff in, and register the Run as `created`.
    pub async fn start(
        &self,
        store: &StateStore,
        event_log: &EventLog,
        session_id: SessionId,
        project: &Project,
        run_name: &str,
        handoff_src_path: &Path,
    ) -> Result<Run, HarnessError> {
        let now = self.now();
        let branch_name = Run::branch_for(run_name);
        let worktree_path = project.repo_path.join("runs").join(run_name);

        event_log.append(
            &Event::new(EventKind::CommandPlan, now)
                .with_session(session_id)
                .with_field("command", "start")
                .with_field("run_name", run_name)
                .with_field("branch", branch_name.clone())
                .with_field("worktree", worktree_path.display().to_string()),
        );

        check_clean(&project.repo_path).await?;

        let mut state = store.load()?;
        if state.run_by_name(project.id, run_name).is_some() {
            return Err(HarnessError::Conflict { what: "run", name: run_name.to_string() });
        }
        if worktree_path.exists() {
            return Err(HarnessError::Conflict { what: "worktree", name: worktree_path.display().to_string() });
        }

        let driver = GitDriver::new(&project.repo_path);
        driver.worktree_add(&worktree_path, &branch_name, "HEAD").await?;
        std::fs::write(worktree_path.join(MARKER_FILE_NAME), b"")?;

        let handoff_bytes = std::fs::read(handoff_src_path)?;
        let handoff = harness_handoff::parse(&handoff_bytes)?;
        let handoff_dest = worktree_path.join("handoff.json");
        harness_handoff::write(&handoff, &handoff_dest)?;

        let verified = worktree_path.is_dir()
            && worktree_path.join(MARKER_FILE_NAME).is_file()
            && driver.status(&worktree_path).await.map(|s| s.branch == branch_name).unwrap_or(false)
            && harness_handoff::parse(&std::fs::read(&handoff_dest)?).is_ok();

        if !verified {
            event_log.append(
                &Event::new(EventKind::CommandVerifyFail, now)
                    .with_session(session_id)
                    .with_field("command", "start")
                    .with_field("run_name", run_name),
            );
            return Err(HarnessError::MarkerMissing { path: worktree_path });
        }
        event_log.append(
            &Event::new(EventKind::CommandVerifyOk, now)
                .with_session(session_id)
                .with_field("command", "start")
                .with_field("run_name", run_name),
        );

        let run = Run::new(run_name, project.id, worktree_path, now);
        state.runs.push(run.clone());
        store.save(&state)?;
        event_log.append(&Event::new(EventKind::StateUpdated, now).with_session(session_id).with_field("run_name", run_name));

        Ok(run)
    }

    /// **run**: spawn the agent in the run's worktree and record the
    /// outcome. Exit 0 transitions `running -> finished`; non-zero leaves
    /// the run `running` with `lastResult` set, for a later retry.
    pub async fn run(
        &self,
        store: &StateStore,
        event_log: &EventLog,
        session_id: SessionId,
        run_id: RunId,
        launcher: &dyn AgentLauncher,
    ) -> Result<Run, HarnessError> {
        let now = self.now();
        let mut state = store.load()?;
        let run = state
            .run(run_id)
            .cloned()
            .ok_or_else(|| HarnessError::MissingWorktree { run_name: run_id.to_string() })?;

        if !run.worktree_path.is_dir() {
            return Err(HarnessError::MissingWorktree { run_name: run.run_name.clone() });
        }

        event_log.append(
            &Event::new(EventKind::CommandExecute, now)
                .with_session(session_id)
                .with_field("command", "run")
                .with_field("run_name", run.run_name.clone()),
        );

        let handoff_path = run.worktree_path.join("handoff.json");
        let status = launcher.launch(&run.worktree_path, &handoff_path).await?;

        let exit_code = status.code();
        let run_mut = state
            .run_mut(run_id)
            .ok_or_else(|| HarnessError::MissingWorktree { run_name: run.run_name.clone() })?;
        run_mut.last_command = Some("run".to_string());
        run_mut.last_result = Some(
            exit_code.map(|c| c.to_string()).unwrap_or_else(|| "terminated by signal".to_string()),
        );
        if status.success() {
            run_mut.transition(RunState::Finished, now);
        } else {
            run_mut.transition(RunState::Running, now);
        }
        let updated = run_mut.clone();

        store.save(&state)?;
        event_log.append(
            &Event::new(EventKind::StateUpdated, now)
                .with_session(session_id)
                .with_field("run_name", updated.run_name.clone())
                .with_field("exit_code", exit_code.map(i64::from).unwrap_or(-1)),
        );

        Ok(updated)
    }

    /// **finish**: require a clean worktree and every task passing, gate on
    /// doc-drift, push to `origin`, and transition the Run to `finished`.
    #[allow(clippy::too_many_arguments)]
    pub async fn finish(
        &self,
        store: &StateStore,
        event_log: &EventLog,
        session_id: SessionId,
        run_id: RunId,
        handoff_path: &Path,
        doc_drift: DocDriftReport,
        doc_strict: bool,
    ) -> Result<Run, HarnessError> {
        let now = self.now();
        let mut state = store.load()?;
        let run = state
            .run(run_id)
            .cloned()
            .ok_or_else(|| HarnessError::MissingWorktree { run_name: run_id.to_string() })?;

        event_log.append(
            &Event::new(EventKind::CommandPlan, now)
                .with_session(session_id)
                .with_field("command", "finish")
                .with_field("run_name", run.run_name.clone()),
        );

        if let Err(err) = check_clean(&run.worktree_path).await {
            event_log.append(
                &Event::new(EventKind::CommandVerifyFail, now)
                    .with_session(session_id)
                    .with_field("command", "finish")
                    .with_field("run_name", run.run_name.clone())
                    .with_field("reason", "dirty_tree"),
            );
            return Err(err);
        }

        let handoff_bytes = std::fs::read(handoff_path)?;
        let handoff: Handoff = harness_handoff::parse(&handoff_bytes)?;
        if !handoff.all_pass() {
            event_log.append(
                &Event::new(EventKind::CommandVerifyFail, now)
                    .with_session(session_id)
                    .with_field("command", "finish")
                    .with_field("run_name", run.run_name.clone())
                    .with_field("reason", "tasks_incomplete"),
            );
            return Err(HarnessError::SchemaError(format!(
                "run {} has incomplete tasks; every task must have passes=true before finish",
                run.run_name
            )));
        }

        if doc_strict {
            if let Err(err) = doc_drift.into_strict_result() {
                event_log.append(
                    &Event::new(EventKind::CommandVerifyFail, now)
                        .with_session(session_id)
                        .with_field("command", "finish")
                        .with_field("run_name", run.run_name.clone())
                        .with_field("reason", "doc_drift"),
                );
                return Err(err);
            }
        }

        let driver = GitDriver::new(project_root_of(&run));
        let outcome = driver.push("origin", &run.branch_name).await?;
        match outcome {
            harness_git::PushOutcome::Ok => {}
            harness_git::PushOutcome::Rejected => {
                event_log.append(
                    &Event::new(EventKind::CommandVerifyFail, now)
                        .with_session(session_id)
                        .with_field("command", "finish")
                        .with_field("reason", "push_rejected"),
                );
                return Err(HarnessError::PushRejected { remote_ref: run.branch_name.clone() });
            }
            harness_git::PushOutcome::AuthError => {
                event_log.append(
                    &Event::new(EventKind::CommandVerifyFail, now)
                        .with_session(session_id)
                        .with_field("command", "finish")
                        .with_field("reason", "auth_error"),
                );
                return Err(HarnessError::AuthError);
            }
        }

        event_log.append(
            &Event::new(EventKind::CommandVerifyOk, now)
                .with_session(session_id)
                .with_field("command", "finish")
                .with_field("run_name", run.run_name.clone()),
        );

        let run_mut = state
            .run_mut(run_id)
            .ok_or_else(|| HarnessError::StateCorrupt(format!("run {run_id} vanished from registry mid-finish")))?;
        run_mut.transition(RunState::Finished, now);
        run_mut.last_command = Some("finish".to_string());
        let updated = run_mut.clone();
        store.save(&state)?;
        event_log.append(&Event::new(EventKind::StateUpdated, now).with_session(session_id).with_field("run_name", updated.run_name.clone()));

        Ok(updated)
    }

    /// **clean**: remove the worktree (and optionally the branch) and drop
    /// the Run from the registry. Gated on the Worktree Path Safety check;
    /// never deletes a path that fails it.
    pub async fn clean(
        &self,
        store: &StateStore,
        event_log: &EventLog,
        session_id: SessionId,
        run_id: RunId,
        delete_branch: bool,
        force: bool,
    ) -> Result<(), HarnessError> {
        let now = self.now();
        let mut state = store.load()?;
        let run = state
            .run(run_id)
            .cloned()
            .ok_or_else(|| HarnessError::MissingWorktree { run_name: run_id.to_string() })?;

        if !force && !matches!(run.state, RunState::Finished | RunState::Parked) {
            return Err(HarnessError::Conflict {
                what: "run state",
                name: format!("{:?} is neither finished nor parked", run.state),
            });
        }

        event_log.append(
            &Event::new(EventKind::CommandPlan, now)
                .with_session(session_id)
                .with_field("command", "clean")
                .with_field("run_name", run.run_name.clone()),
        );

        // A `parked` run's worktree is already gone from disk (that's what
        // parked it in the first place, §4.G) — the path-safety gate's
        // canonicalize step would fail on a path that doesn't exist, so
        // there's nothing to gate or remove. Just drop the registry entry.
        if !run.worktree_path.exists() {
            state.remove_run(run_id);
            store.save(&state)?;
            event_log.append(
                &Event::new(EventKind::StateUpdated, now)
                    .with_session(session_id)
                    .with_field("run_name", run.run_name.clone()),
            );
            return Ok(());
        }

        let safe_path = check_worktree_path_safety(&run.worktree_path, &state.projects)?;

        let driver = GitDriver::new(project_root_of(&run));
        driver.worktree_remove(&safe_path, true).await?;
        if delete_branch {
            let _ = driver.branch_delete(&run.branch_name, true).await;
        }

        if safe_path.exists() {
            event_log.append(
                &Event::new(EventKind::CommandVerifyFail, now)
                    .with_session(session_id)
                    .with_field("command", "clean")
                    .with_field("run_name", run.run_name.clone()),
            );
            return Err(HarnessError::MissingWorktree { run_name: run.run_name.clone() });
        }

        event_log.append(
            &Event::new(EventKind::CommandVerifyOk, now)
                .with_session(session_id)
                .with_field("command", "clean")
                .with_field("run_name", run.run_name.clone()),
        );

        state.remove_run(run_id);
        store.save(&state)?;
        event_log.append(&Event::new(EventKind::StateUpdated, now).with_session(session_id).with_field("run_name", run.run_name));

        Ok(())
    }
}

/// A run's worktree is always `<repoPath>/runs/<runName>`; the project root
/// two levels up is where `origin` is configured.
fn project_root_of(run: &Run) -> PathBuf {
    run.worktree_path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| run.worktree_path.clone())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
