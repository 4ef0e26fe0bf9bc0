//! `tiergate route`: classify and route one prompt.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::engine::{RouteRequest, RoutedRequest, RoutingEngine};
use crate::llm::{Capability, RoutingMode};

#[derive(Args, Debug, Clone, Default)]
pub struct RouteArgs {
    /// Prompt text. Use `-` to read from stdin.
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,

    /// System prompt accompanying the request
    #[arg(long)]
    pub system: Option<String>,

    /// Messages in the conversation so far, including this one
    #[arg(long)]
    pub messages: Option<usize>,

    /// Parent request id; steps the tier down one level
    #[arg(long)]
    pub parent: Option<String>,

    /// Pin the request to a model (e.g. `gpt-4o` or `openai/gpt-4o`)
    #[arg(long)]
    pub force_model: Option<String>,

    /// Treat as heartbeat traffic and use the cheapest model
    #[arg(long)]
    pub heartbeat: bool,

    /// Only consider models with this capability (chat, code, analysis, summarize)
    #[arg(long)]
    pub require: Option<Capability>,

    /// Routing mode for this request (eco, standard, performance)
    #[arg(long)]
    pub mode: Option<RoutingMode>,

    /// Append a completion record to the routing log
    #[arg(long)]
    pub record: bool,

    /// Input tokens for the recorded completion (default: prompt chars / 4)
    #[arg(long, requires = "record")]
    pub input_tokens: Option<u64>,

    /// Output tokens for the recorded completion
    #[arg(long, requires = "record", default_value_t = 0)]
    pub output_tokens: u64,

    /// Latency in milliseconds for the recorded completion
    #[arg(long, requires = "record", default_value_t = 0)]
    pub latency_ms: u64,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl RouteArgs {
    fn read_prompt(&self) -> Result<String> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompt file: {}", path.display()));
        }
        match self.prompt.as_deref() {
            // Heartbeats route on price alone; don't wait on stdin for one.
            None if self.heartbeat => Ok(String::new()),
            Some("-") | None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read prompt from stdin")?;
                Ok(buf)
            }
            Some(prompt) => Ok(prompt.to_string()),
        }
    }

    fn to_request(&self, prompt: String) -> RouteRequest {
        RouteRequest {
            prompt,
            system_prompt: self.system.clone(),
            message_count: self.messages,
            parent_request_id: self.parent.clone(),
            force_model: self.force_model.clone(),
            heartbeat: self.heartbeat,
            require_capability: self.require,
        }
    }
}

pub fn run_route_command(engine: &RoutingEngine, args: RouteArgs) -> Result<()> {
    let prompt = args.read_prompt()?;
    if prompt.trim().is_empty() && !args.heartbeat {
        bail!("Prompt is empty");
    }

    if let Some(mode) = args.mode {
        engine.set_mode(mode);
    }

    let input_tokens = args
        .input_tokens
        .unwrap_or_else(|| (prompt.chars().count() / 4) as u64);
    let routed = engine.decide(&args.to_request(prompt))?;

    let recorded = args.record.then(|| {
        engine.record_completion(
            &routed,
            input_tokens,
            args.output_tokens,
            Duration::from_millis(args.latency_ms),
        )
    });

    if args.json {
        let mut value = route_json(&routed);
        if let Some(entry) = &recorded {
            value["cost_usd"] = serde_json::Value::String(entry.cost_usd.to_string());
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_route(&routed);
        if let Some(entry) = &recorded {
            println!(
                "  Recorded:    {} tokens in, {} out, ${}",
                entry.input_tokens,
                entry.output_tokens,
                entry.cost_usd.round_dp(6)
            );
        }
    }
    Ok(())
}

fn route_json(routed: &RoutedRequest) -> serde_json::Value {
    let decision = &routed.decision;
    let breakdown: serde_json::Map<String, serde_json::Value> = routed
        .classification
        .breakdown
        .iter()
        .map(|(dim, score)| (dim.as_str().to_string(), serde_json::json!(score)))
        .collect();

    serde_json::json!({
        "request_id": routed.request_id,
        "model": decision.model.id,
        "provider": decision.model.provider,
        "tier": decision.tier,
        "classified_tier": decision.classified_tier,
        "score": decision.score,
        "mode": decision.mode,
        "override_kind": decision.override_kind,
        "reason": decision.reason,
        "breakdown": breakdown,
        "classification_us": routed.classification.elapsed.as_micros() as u64,
    })
}

fn print_route(routed: &RoutedRequest) {
    let decision = &routed.decision;
    println!("Routing Decision");
    println!("================\n");
    println!("  Request:     {}", routed.request_id);
    println!("  Model:       {}", decision.model);
    println!(
        "  Tier:        {} (classified {}, score {:.3})",
        decision.tier, decision.classified_tier, decision.score
    );
    println!("  Mode:        {}", decision.mode);
    println!("  Override:    {}", decision.override_kind);
    println!("  Reason:      {}", decision.reason);
    println!(
        "  Classified:  {} µs",
        routed.classification.elapsed.as_micros()
    );

    println!("\n  Dimensions:");
    for (dim, score) in &routed.classification.breakdown {
        println!("    {:<22} {:.3}", dim.as_str(), score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_without_prompt_skips_stdin() {
        let args = RouteArgs {
            heartbeat: true,
            ..Default::default()
        };
        assert_eq!(args.read_prompt().unwrap(), "");
    }

    #[test]
    fn inline_prompt_is_used_verbatim() {
        let args = RouteArgs {
            prompt: Some("summarize this".to_string()),
            heartbeat: true,
            ..Default::default()
        };
        assert_eq!(args.read_prompt().unwrap(), "summarize this");
    }

    #[test]
    fn prompt_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "from a file").unwrap();
        let args = RouteArgs {
            file: Some(path),
            ..Default::default()
        };
        assert_eq!(args.read_prompt().unwrap(), "from a file");
    }
}
