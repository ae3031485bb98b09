// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! PID liveness check.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// True if `pid` refers to a process this host's kernel still knows about.
///
/// Sends signal 0 — a no-op existence probe, not a real signal — rather
/// than scraping `/proc` or shelling out to `ps`, so the check is portable
/// across the POSIX targets this tool supports. An ambiguous response
/// (`EPERM`, meaning the PID exists but is owned by another user — it may
/// have been reused after our recorded holder died) is treated as "alive":
/// this fails closed rather than open, so a reused PID never triggers a
/// takeover of a lock we can't actually prove is abandoned.
pub fn is_pid_alive(pid: u32) -> bool {
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(_) => true,
    }
}

#[cfg(test)]
#[path = "pid_tests.rs"]
mod tests;
