//! Operator CLI.

mod mode;
mod report;
mod route;

use clap::{Parser, Subcommand};

pub use mode::ModeArgs;
pub use report::{EntryArgs, RecentArgs, StatsArgs};
pub use route::RouteArgs;

use crate::config::Config;
use crate::engine::RoutingEngine;

#[derive(Parser, Debug)]
#[command(
    name = "tiergate",
    version,
    about = "Prompt complexity classification and cost-aware model routing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify and route a prompt, optionally recording the completion
    Route(RouteArgs),

    /// Usage, cost and savings over a recent window
    Stats(StatsArgs),

    /// Show the most recent routing log entries
    Recent(RecentArgs),

    /// Show one routing log entry by request id
    Entry(EntryArgs),

    /// Show the preference lists for a routing mode
    Mode(ModeArgs),
}

/// Run a CLI command against the environment's configuration.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let engine = RoutingEngine::with_file_log(config);

    let result = match cli.command {
        Command::Route(args) => route::run_route_command(&engine, args),
        Command::Stats(args) => report::run_stats_command(&engine, &args),
        Command::Recent(args) => report::run_recent_command(&engine, &args),
        Command::Entry(args) => report::run_entry_command(&engine, &args),
        Command::Mode(args) => mode::run_mode_command(&engine, &args),
    };

    engine.flush().await;
    result
}
