//! Read-side commands: `stats`, `recent`, `entry`.

use anyhow::Result;
use clap::Args;
use uuid::Uuid;

use crate::engine::RoutingEngine;
use crate::history::RoutingLogEntry;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Window size in days
    #[arg(short, long, default_value_t = 7)]
    pub days: u32,

    /// Counterfactual baseline model (default: configured baseline)
    #[arg(long)]
    pub baseline: Option<String>,

    /// Print JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RecentArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    /// Request id
    pub id: Uuid,
}

pub fn run_stats_command(engine: &RoutingEngine, args: &StatsArgs) -> Result<()> {
    let stats = engine.stats(args.days, args.baseline.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{stats}");
    }
    Ok(())
}

pub fn run_recent_command(engine: &RoutingEngine, args: &RecentArgs) -> Result<()> {
    let scan = engine.recent(args.count)?;

    if args.json {
        for entry in &scan.entries {
            println!("{}", serde_json::to_string(entry)?);
        }
        return Ok(());
    }

    if scan.entries.is_empty() {
        eprintln!("No routing log entries found.");
    }
    for entry in &scan.entries {
        println!("{}", summary_line(entry));
    }
    if scan.malformed > 0 {
        eprintln!("({} malformed line(s) skipped)", scan.malformed);
    }
    Ok(())
}

pub fn run_entry_command(engine: &RoutingEngine, args: &EntryArgs) -> Result<()> {
    match engine.entry(args.id)? {
        Some(entry) => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
            Ok(())
        }
        None => anyhow::bail!("No routing log entry with id {}", args.id),
    }
}

fn summary_line(entry: &RoutingLogEntry) -> String {
    format!(
        "{}  {}  {:<8} {:<18} {:<11} {:<17} {:>7} ms  ${}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.request_id,
        entry.tier.as_str(),
        entry.model,
        entry.mode.as_str(),
        entry.override_kind.as_str(),
        entry.latency_ms,
        entry.cost_usd.round_dp(6)
    )
}
