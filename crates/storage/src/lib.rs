// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harness-storage: the Durable State Store (§4.C), the Event Log (§4.D),
//! the per-project Doc Decision store (§4.I), and the Observer-mode inbox
//! capture log (§5/§9). All four share the `atomic_write` primitive from
//! `harness-core`.

mod decision_store;
mod event_log;
mod inbox_log;
mod store;

pub use decision_store::DocDecisionStore;
pub use event_log::{Event, EventKind, EventLog};
pub use inbox_log::InboxCaptureLog;
pub use store::StateStore;
