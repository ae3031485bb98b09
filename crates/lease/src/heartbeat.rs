// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The heartbeat background task: a dedicated cooperative task that owns
//! the heartbeat file and a cancel channel, per §9's design note. Only the
//! long-lived interactive `session` command spawns one; short-lived
//! mutating commands hold the lease just for their own duration and never
//! start a heartbeat loop.

use chrono::Utc;
use harness_core::{atomic_write, HarnessError, HeartbeatFile, SessionId};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

/// Interval between heartbeat writes while a session is alive.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Write a fresh heartbeat record for `session_id` to `path`, atomically.
pub fn write_heartbeat(path: &Path, session_id: SessionId, now: chrono::DateTime<Utc>) -> Result<(), HarnessError> {
    let heartbeat = HeartbeatFile::new(session_id, now);
    let bytes = serde_json::to_vec(&heartbeat)
        .map_err(|e| HarnessError::StateCorrupt(format!("failed to serialize heartbeat: {e}")))?;
    atomic_write(path, &bytes)?;
    Ok(())
}

/// A running heartbeat task. Dropping this without calling [`Heartbeat::stop`]
/// still cancels the task (the cancel channel's sender is dropped, which the
/// loop also observes), but `stop` additionally awaits the task's exit.
pub struct Heartbeat {
    cancel_tx: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl Heartbeat {
    /// Start writing a heartbeat for `session_id` to `path` every `interval`,
    /// until [`Heartbeat::stop`] is called.
    pub fn spawn(path: PathBuf, session_id: SessionId, interval: Duration) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; consume it

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = write_heartbeat(&path, session_id, Utc::now()) {
                            tracing::warn!(error = %err, "failed to write heartbeat");
                        }
                    }
                    changed = cancel_rx.changed() => {
                        if changed.is_err() || *cancel_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel_tx, task }
    }

    /// Signal the task to stop and wait for it to exit. The session's cancel
    /// handler calls this before releasing the lock, per §9.
    pub async fn stop(self) {
        let _ = self.cancel_tx.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
