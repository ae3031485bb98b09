// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Controller Lease: a process-wide single-writer lock over the
//! registry, with PID liveness checking and heartbeat-freshness-gated
//! takeover (§4.E).

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use harness_core::{atomic_write, HarnessError, HeartbeatFile, LockFile, SessionId};
use harness_storage::{Event, EventKind, EventLog};
use serde::de::DeserializeOwned;

use crate::pid::is_pid_alive;

/// A heartbeat older than this is stale: the holder is presumed dead
/// regardless of what the lock file claims.
pub const HEARTBEAT_STALE_AFTER: ChronoDuration = ChronoDuration::minutes(5);

/// Confirms (or denies) taking over a lock whose heartbeat is merely stale,
/// not provably dead. The CLI supplies an interactive implementation that
/// reads a TTY prompt; a non-interactive invocation supplies [`NeverConfirm`].
pub trait TakeoverPrompt {
    fn confirm(&self, holder_pid: u32, last_beat_at: DateTime<Utc>) -> bool;
}

/// Never confirms: the non-interactive default. A stale-heartbeat takeover
/// in a non-interactive invocation falls back to Observer mode rather than
/// blocking on a prompt it cannot show.
pub struct NeverConfirm;

impl TakeoverPrompt for NeverConfirm {
    fn confirm(&self, _holder_pid: u32, _last_beat_at: DateTime<Utc>) -> bool {
        false
    }
}

/// Always confirms — used when the caller already passed `--force`, so no
/// prompt is needed, and in tests that exercise the confirmed path.
pub struct AlwaysConfirm;

impl TakeoverPrompt for AlwaysConfirm {
    fn confirm(&self, _holder_pid: u32, _last_beat_at: DateTime<Utc>) -> bool {
        true
    }
}

/// The two well-known file paths the lease lives at, under the home
/// directory's `locks/` subdirectory.
#[derive(Debug, Clone)]
pub struct LeasePaths {
    pub lock: PathBuf,
    pub heartbeat: PathBuf,
}

impl LeasePaths {
    pub fn under(home: &Path) -> Self {
        let dir = home.join("locks");
        Self { lock: dir.join("commander.lock"), heartbeat: dir.join("commander.heartbeat") }
    }
}

/// Outcome of [`acquire`]: either this process is now the Controller, or it
/// is an Observer and must not mutate anything.
pub enum Lease {
    Controller(ControllerLease),
    Observer { holder_pid: u32, holder_session: SessionId },
}

impl Lease {
    /// Convenience for mutating commands: succeed only if the lease was
    /// actually acquired, otherwise produce the exit-code-3 error directly.
    pub fn into_controller(self) -> Result<ControllerLease, HarnessError> {
        match self {
            Lease::Controller(c) => Ok(c),
            Lease::Observer { holder_pid, holder_session } => {
                Err(HarnessError::LockHeld { pid: holder_pid, session_id: holder_session.to_string() })
            }
        }
    }
}

/// A held Controller Lease. Releases itself on drop (the "release-on-exit
/// hook" from §4.E) if [`ControllerLease::release`] wasn't already called.
pub struct ControllerLease {
    paths: LeasePaths,
    pub session_id: SessionId,
    pub pid: u32,
    released: AtomicBool,
}

impl ControllerLease {
    pub fn heartbeat_path(&self) -> &Path {
        &self.paths.heartbeat
    }

    /// Release the lease: delete both the lock and heartbeat files and
    /// record `LOCK_RELEASED`. Idempotent — a second call is a no-op.
    pub fn release(&self, event_log: &EventLog, now: DateTime<Utc>) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = std::fs::remove_file(&self.paths.lock);
        let _ = std::fs::remove_file(&self.paths.heartbeat);
        event_log.append(&Event::new(EventKind::LockReleased, now).with_session(self.session_id));
    }
}

impl Drop for ControllerLease {
    fn drop(&mut self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            let _ = std::fs::remove_file(&self.paths.lock);
            let _ = std::fs::remove_file(&self.paths.heartbeat);
        }
    }
}

/// Attempt to become the Controller under `home`, falling back to Observer
/// mode per the five-step protocol in §4.E.
pub fn acquire(
    home: &Path,
    event_log: &EventLog,
    pid: u32,
    now: DateTime<Utc>,
    force: bool,
    prompt: &dyn TakeoverPrompt,
) -> Result<Lease, HarnessError> {
    let paths = LeasePaths::under(home);
    if let Some(dir) = paths.lock.parent() {
        std::fs::create_dir_all(dir)?;
    }

    match try_create_exclusive(&paths.lock) {
        Ok(()) => {
            let session_id = take_over(&paths, pid, now)?;
            event_log.append(
                &Event::new(EventKind::LockAcquired, now)
                    .with_session(session_id)
                    .with_field("pid", pid as i64),
            );
            return Ok(Lease::Controller(ControllerLease {
                paths,
                session_id,
                pid,
                released: AtomicBool::new(false),
            }));
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e.into()),
    }

    let existing_lock: LockFile = read_json(&paths.lock)?;

    if !is_pid_alive(existing_lock.pid) {
        let session_id = take_over(&paths, pid, now)?;
        event_log.append(
            &Event::new(EventKind::LockStaleTakeover, now)
                .with_session(session_id)
                .with_field("reason", "pid_dead")
                .with_field("previous_pid", existing_lock.pid as i64),
        );
        return Ok(Lease::Controller(ControllerLease {
            paths,
            session_id,
            pid,
            released: AtomicBool::new(false),
        }));
    }

    let heartbeat: Option<HeartbeatFile> = read_json_opt(&paths.heartbeat)?;
    let heartbeat = match heartbeat {
        Some(hb) if hb.session_id == existing_lock.session_id => hb,
        _ => {
            if !force {
                return Err(HarnessError::LockInconsistent);
            }
            let session_id = take_over(&paths, pid, now)?;
            event_log.append(
                &Event::new(EventKind::LockStaleTakeover, now)
                    .with_session(session_id)
                    .with_field("reason", "inconsistent_forced")
                    .with_field("previous_pid", existing_lock.pid as i64),
            );
            return Ok(Lease::Controller(ControllerLease {
                paths,
                session_id,
                pid,
                released: AtomicBool::new(false),
            }));
        }
    };

    if heartbeat.is_stale(now, HEARTBEAT_STALE_AFTER) {
        if force || prompt.confirm(existing_lock.pid, heartbeat.last_beat_at) {
            let session_id = take_over(&paths, pid, now)?;
            event_log.append(
                &Event::new(EventKind::LockStaleTakeover, now)
                    .with_session(session_id)
                    .with_field("reason", "heartbeat_timeout")
                    .with_field("previous_pid", existing_lock.pid as i64),
            );
            return Ok(Lease::Controller(ControllerLease {
                paths,
                session_id,
                pid,
                released: AtomicBool::new(false),
            }));
        }
    }

    event_log.append(
        &Event::new(EventKind::LockDenied, now)
            .with_field("holder_pid", existing_lock.pid as i64)
            .with_field("holder_session", existing_lock.session_id.to_string()),
    );
    Ok(Lease::Observer { holder_pid: existing_lock.pid, holder_session: existing_lock.session_id })
}

/// Atomically overwrite both the lock and heartbeat files for a new session.
/// Never deletes first — an overwrite-in-place never opens a window where
/// neither file exists (§4.E).
fn take_over(paths: &LeasePaths, pid: u32, now: DateTime<Utc>) -> Result<SessionId, HarnessError> {
    let session_id = SessionId::new();
    let lock = LockFile::new(pid, session_id, now);
    let lock_bytes = serde_json::to_vec(&lock)
        .map_err(|e| HarnessError::StateCorrupt(format!("failed to serialize lock file: {e}")))?;
    atomic_write(&paths.lock, &lock_bytes)?;
    crate::heartbeat::write_heartbeat(&paths.heartbeat, session_id, now)?;
    Ok(session_id)
}

fn try_create_exclusive(path: &Path) -> std::io::Result<()> {
    OpenOptions::new().write(true).create_new(true).open(path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, HarnessError> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| HarnessError::StateCorrupt(format!("{}: {e}", path.display())))
}

fn read_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, HarnessError> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(read_json(path)?))
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
