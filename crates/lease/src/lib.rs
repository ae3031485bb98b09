// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! The Controller Lease: single-writer coordination over the registry
//! (§4.E). A process either becomes the Controller (and may mutate state)
//! or an Observer (read-only, plus inbox capture).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod heartbeat;
mod lease;
mod pid;

pub use heartbeat::{write_heartbeat, Heartbeat, HEARTBEAT_INTERVAL};
pub use lease::{
    acquire, AlwaysConfirm, ControllerLease, Lease, LeasePaths, NeverConfirm, TakeoverPrompt,
    HEARTBEAT_STALE_AFTER,
};
pub use pid::is_pid_alive;
