// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! TTY-backed confirmation prompts: the concrete implementations of
//! `harness_lease::TakeoverPrompt` and `harness_lifecycle::DocDriftResolver`
//! that the rest of the workspace only sees as trait objects.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use harness_core::DriftItemId;
use harness_lease::TakeoverPrompt;
use harness_lifecycle::{DocDriftDisposition, DocDriftResolver};

pub struct TtyTakeoverPrompt;

impl TakeoverPrompt for TtyTakeoverPrompt {
    fn confirm(&self, holder_pid: u32, last_beat_at: DateTime<Utc>) -> bool {
        eprint!("lock held by pid {holder_pid}, last heartbeat at {last_beat_at}; take over? [y/N] ");
        let _ = io::stderr().flush();
        read_line()
            .map(|line| matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

pub struct TtyDocDriftResolver;

impl DocDriftResolver for TtyDocDriftResolver {
    fn resolve(&self, item_id: &DriftItemId) -> Option<DocDriftDisposition> {
        eprintln!("undocumented: {item_id}");
        eprint!("[u]pdate docs / mark [i]nternal / [d]efer / [c]ontinue: ");
        let _ = io::stderr().flush();
        let choice = read_line()?;
        match choice.trim().to_lowercase().as_str() {
            "u" => {
                eprint!("description: ");
                let _ = io::stderr().flush();
                let description = read_line().unwrap_or_default();
                Some(DocDriftDisposition::UpdateDocs { description: description.trim().to_string() })
            }
            "i" => Some(DocDriftDisposition::MarkInternal),
            "d" => Some(DocDriftDisposition::Defer),
            _ => Some(DocDriftDisposition::Continue),
        }
    }
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    Some(line)
}
