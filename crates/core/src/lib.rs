// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harness-core: shared data model, error taxonomy, and clock abstraction
//! for the cloud-harness control plane.

pub mod atomic;
pub mod clock;
pub mod decision;
pub mod error;
pub mod handoff_types;
pub mod ids;
pub mod inbox;
pub mod lease_types;
pub mod project;
#[cfg(feature = "test-support")]
pub mod proptest_support;
pub mod run;
pub mod state;

pub use atomic::atomic_write;
pub use clock::{Clock, FakeClock, SystemClock};
pub use decision::{DecisionExpiry, DecisionKind, DocDecision, DriftItemId, DEFAULT_DEFER_DAYS};
pub use error::HarnessError;
pub use handoff_types::{Category, Handoff, HandoffMeta, Task};
pub use ids::{ProjectId, RunId, TaskId};
pub use inbox::{InboxItem, InboxItemId, TriageStatus};
pub use lease_types::{HeartbeatFile, LockFile, SessionId};
pub use project::{Project, ProjectStatus};
pub use run::{Run, RunState};
pub use state::State;
