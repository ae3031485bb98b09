// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! ANSI color helpers for terminal output. Respects `NO_COLOR`/`COLOR` and
//! falls back to plain text when stdout isn't a TTY.

use std::io::IsTerminal;

const HEADER: &str = "74";
const MUTED: &str = "240";

fn should_colorize() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("COLOR").is_some() {
        return true;
    }
    std::io::stdout().is_terminal()
}

pub fn header(text: &str) -> String {
    if should_colorize() {
        format!("\x1b[1;38;5;{HEADER}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn muted(text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{MUTED}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Styling for `clap`'s generated help and error output.
pub fn styles() -> clap::builder::styling::Styles {
    use clap::builder::styling::AnsiColor;
    clap::builder::styling::Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
}
