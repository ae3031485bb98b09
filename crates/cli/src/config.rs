// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! Process-wide configuration (§10.4): the home directory and whether this
//! invocation can show interactive prompts. Always constructed explicitly
//! and threaded through to each command, never a global singleton, so tests
//! can point it at a throwaway directory.

use std::io::IsTerminal;
use std::path::PathBuf;

use harness_storage::{EventLog, InboxCaptureLog, StateStore};

#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub interactive: bool,
}

impl Config {
    /// Build a `Config` from the process environment: `CLOUD_HARNESS_HOME`
    /// overrides the default `~/.cloud-harness` home, and interactivity is
    /// detected from whether both stdin and stdout are a TTY.
    pub fn from_env() -> Self {
        let home = std::env::var_os("CLOUD_HARNESS_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(default_home);
        Self { home, interactive: is_interactive() }
    }

    /// Build a `Config` pinned to an explicit home directory, for tests.
    pub fn for_home(home: PathBuf) -> Self {
        Self { home, interactive: is_interactive() }
    }

    pub fn registry(&self) -> StateStore {
        StateStore::new(self.home.clone())
    }

    pub fn event_log(&self) -> EventLog {
        EventLog::new(self.home.join("events.log"))
    }

    pub fn inbox_log(&self) -> InboxCaptureLog {
        InboxCaptureLog::new(self.home.join("inbox.log"))
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".cloud-harness")
}

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}
