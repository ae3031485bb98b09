// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cloud Harness Contributors

//! `harness`: the control plane CLI for supervising autonomous coding agents
//! against real Git repositories (§6).

use anyhow::Result;
use clap::{Parser, Subcommand};
use harness_cli::color;
use harness_cli::commands;
use harness_cli::config::Config;
use harness_core::HarnessError;

#[derive(Parser)]
#[command(
    name = "harness",
    version,
    about = "Supervise autonomous coding agents against real Git repositories",
    styles = color::styles()
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree and branch for a new run
    Start(commands::start::StartArgs),
    /// Spawn the agent in an existing run's worktree
    Run(commands::run::RunArgs),
    /// Push a finished run's branch and mark it finished
    Finish(commands::finish::FinishArgs),
    /// Remove a run's worktree, and optionally its branch
    Clean(commands::clean::CleanArgs),
    /// List known projects and runs
    List,
    /// Show the reconciled state of every project and run
    Status,
    /// Show the single next action to take
    Next,
    /// Hold the controller lease interactively until cancelled
    Session,
    /// Show or set the focused project
    Focus(commands::focus::FocusArgs),
    /// Capture, list, promote, or dismiss inbox items
    Inbox(commands::inbox::InboxArgs),
    /// Check registry and lock health
    Doctor(commands::doctor::DoctorArgs),
    /// Discover and register candidate projects
    Bootstrap(commands::bootstrap::BootstrapArgs),
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = dispatch().await {
        let code = err.downcast_ref::<HarnessError>().map(|e| e.exit_code()).unwrap_or(1);
        let remediation = err.downcast_ref::<HarnessError>().and_then(|e| e.remediation());
        eprintln!("Error: {err}");
        if let Some(hint) = remediation {
            eprintln!("  {hint}");
        }
        std::process::exit(code);
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("CLOUD_HARNESS_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn dispatch() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Start(args) => commands::start::handle(args, &config).await?,
        Commands::Run(args) => commands::run::handle(args, &config).await?,
        Commands::Finish(args) => commands::finish::handle(args, &config).await?,
        Commands::Clean(args) => commands::clean::handle(args, &config).await?,
        Commands::List => commands::list::handle(&config).await?,
        Commands::Status => commands::status::handle(&config).await?,
        Commands::Next => commands::next::handle(&config).await?,
        Commands::Session => commands::session::handle(&config).await?,
        Commands::Focus(args) => commands::focus::handle(args, &config).await?,
        Commands::Inbox(args) => commands::inbox::handle(args, &config).await?,
        Commands::Doctor(args) => commands::doctor::handle(args, &config).await?,
        Commands::Bootstrap(args) => commands::bootstrap::handle(args, &config).await?,
    }

    Ok(())
}
