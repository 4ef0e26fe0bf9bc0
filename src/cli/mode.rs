//! `tiergate mode`: inspect a routing mode's preference lists.

use anyhow::Result;
use clap::Args;
use tiergate_classifier::Tier;

use crate::engine::RoutingEngine;
use crate::llm::RoutingMode;

#[derive(Args, Debug, Clone)]
pub struct ModeArgs {
    /// Mode to show (default: the configured mode)
    pub mode: Option<RoutingMode>,
}

pub fn run_mode_command(engine: &RoutingEngine, args: &ModeArgs) -> Result<()> {
    let configured = engine.mode();
    let mode = args.mode.unwrap_or(configured);
    let providers = engine.providers();

    println!("Routing mode: {mode}");
    if mode != configured {
        println!("(configured default: {configured}; set TIERGATE_MODE to change it)");
    }
    println!("Available providers: {providers}\n");

    for tier in Tier::ALL {
        println!("  {tier}:");
        for (rank, model) in engine.preferences(mode, tier).into_iter().enumerate() {
            let marker = if providers.contains(model.provider) {
                "✓"
            } else {
                "✗"
            };
            println!(
                "    {}. {} {:<20} {}/M in, {}/M out",
                rank + 1,
                marker,
                model.id,
                model.input_cost_per_mtok,
                model.output_cost_per_mtok
            );
        }
    }
    Ok(())
}
