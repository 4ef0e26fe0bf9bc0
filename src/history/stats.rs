//! Aggregate usage and savings statistics, derived from log entries.
//!
//! Nothing here is cached: every call recomputes from the entries it is
//! given.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tiergate_classifier::Tier;

use crate::history::entry::RoutingLogEntry;
use crate::llm::costs;
use crate::llm::{ModelSpec, Provider};

/// Requests and cost attributed to one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelUsage {
    pub model: String,
    pub provider: Provider,
    pub requests: usize,
    pub cost_usd: Decimal,
    /// Share of total requests, 0–100.
    pub percent: f64,
}

/// Requests that ended up in one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierUsage {
    pub tier: Tier,
    pub requests: usize,
    /// Share of total requests, 0–100.
    pub percent: f64,
}

/// Summary of a window of the routing log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_requests: usize,
    pub total_cost_usd: Decimal,
    pub baseline_model: String,
    /// Cost had every request been served by the baseline model.
    pub counterfactual_cost_usd: Decimal,
    /// `counterfactual - actual`. Negative when routing cost more than the
    /// baseline would have.
    pub savings_usd: Decimal,
    pub savings_percent: Decimal,
    /// Sorted by request count, then model id.
    pub by_model: Vec<ModelUsage>,
    /// In tier order, only tiers that occurred.
    pub by_tier: Vec<TierUsage>,
    pub avg_latency_ms: f64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Lines in the window that could not be parsed.
    pub malformed_lines: usize,
}

/// Aggregate `entries` against the `baseline` model's pricing.
pub fn compute_stats(entries: &[RoutingLogEntry], baseline: &ModelSpec) -> AggregateStats {
    if entries.is_empty() {
        let now = Utc::now();
        return AggregateStats {
            total_requests: 0,
            total_cost_usd: Decimal::ZERO,
            baseline_model: baseline.id.clone(),
            counterfactual_cost_usd: Decimal::ZERO,
            savings_usd: Decimal::ZERO,
            savings_percent: Decimal::ZERO,
            by_model: Vec::new(),
            by_tier: Vec::new(),
            avg_latency_ms: 0.0,
            period_start: now,
            period_end: now,
            malformed_lines: 0,
        };
    }

    let total = entries.len();
    let mut total_cost = Decimal::ZERO;
    let mut counterfactual = Decimal::ZERO;
    let mut latency_sum: u128 = 0;
    let mut period_start = entries[0].timestamp;
    let mut period_end = entries[0].timestamp;
    let mut models: HashMap<&str, (Provider, usize, Decimal)> = HashMap::new();
    let mut tiers: BTreeMap<Tier, usize> = BTreeMap::new();

    for entry in entries {
        total_cost += entry.cost_usd;
        counterfactual += costs::counterfactual(baseline, entry.input_tokens, entry.output_tokens);
        latency_sum += u128::from(entry.latency_ms);
        period_start = period_start.min(entry.timestamp);
        period_end = period_end.max(entry.timestamp);

        let slot = models
            .entry(entry.model.as_str())
            .or_insert((entry.provider, 0, Decimal::ZERO));
        slot.1 += 1;
        slot.2 += entry.cost_usd;

        *tiers.entry(entry.tier).or_default() += 1;
    }

    let share = |count: usize| count as f64 / total as f64 * 100.0;

    let mut by_model: Vec<ModelUsage> = models
        .into_iter()
        .map(|(model, (provider, requests, cost_usd))| ModelUsage {
            model: model.to_string(),
            provider,
            requests,
            cost_usd,
            percent: share(requests),
        })
        .collect();
    by_model.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.model.cmp(&b.model)));

    let by_tier = tiers
        .into_iter()
        .map(|(tier, requests)| TierUsage {
            tier,
            requests,
            percent: share(requests),
        })
        .collect();

    let savings = counterfactual - total_cost;
    let savings_percent = if counterfactual.is_zero() {
        Decimal::ZERO
    } else {
        savings / counterfactual * Decimal::ONE_HUNDRED
    };

    AggregateStats {
        total_requests: total,
        total_cost_usd: total_cost,
        baseline_model: baseline.id.clone(),
        counterfactual_cost_usd: counterfactual,
        savings_usd: savings,
        savings_percent,
        by_model,
        by_tier,
        avg_latency_ms: latency_sum as f64 / total as f64,
        period_start,
        period_end,
        malformed_lines: 0,
    }
}

impl std::fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Routing Stats")?;
        writeln!(f, "=============\n")?;
        writeln!(
            f,
            "  Period:        {} → {}",
            self.period_start.format("%Y-%m-%d %H:%M"),
            self.period_end.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(f, "  Requests:      {}", self.total_requests)?;
        writeln!(f, "  Actual cost:   ${}", self.total_cost_usd.round_dp(4))?;
        writeln!(
            f,
            "  Baseline cost: ${} (all requests on {})",
            self.counterfactual_cost_usd.round_dp(4),
            self.baseline_model
        )?;
        writeln!(
            f,
            "  Savings:       ${} ({}%)",
            self.savings_usd.round_dp(4),
            self.savings_percent.round_dp(1)
        )?;
        writeln!(f, "  Avg latency:   {:.0} ms", self.avg_latency_ms)?;
        if self.malformed_lines > 0 {
            writeln!(f, "  Skipped:       {} malformed line(s)", self.malformed_lines)?;
        }

        if !self.by_model.is_empty() {
            writeln!(f, "\n  By model:")?;
            for usage in &self.by_model {
                writeln!(
                    f,
                    "    {:<20} {:>6} {:>5.1}%  ${}",
                    usage.model,
                    usage.requests,
                    usage.percent,
                    usage.cost_usd.round_dp(4)
                )?;
            }
        }

        if !self.by_tier.is_empty() {
            writeln!(f, "\n  By tier:")?;
            for usage in &self.by_tier {
                writeln!(
                    f,
                    "    {:<20} {:>6} {:>5.1}%",
                    usage.tier.as_str(),
                    usage.requests,
                    usage.percent
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;
    use crate::llm::{ModelCatalog, OverrideKind, RoutingMode};

    fn entry(
        model: &ModelSpec,
        tier: Tier,
        input_tokens: u64,
        output_tokens: u64,
        latency_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> RoutingLogEntry {
        RoutingLogEntry {
            request_id: Uuid::new_v4(),
            timestamp,
            prompt_hash: String::new(),
            score: 0.2,
            tier,
            model: model.id.clone(),
            provider: model.provider,
            mode: RoutingMode::Eco,
            override_kind: OverrideKind::None,
            input_tokens,
            output_tokens,
            cost_usd: costs::estimate(model, input_tokens, output_tokens),
            latency_ms,
            parent_request_id: None,
            classification_us: None,
        }
    }

    #[test]
    fn test_empty_window_has_zero_totals() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let stats = compute_stats(&[], baseline);

        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.total_cost_usd, Decimal::ZERO);
        assert_eq!(stats.savings_percent, Decimal::ZERO);
        assert!(stats.by_model.is_empty());
        assert!(stats.by_tier.is_empty());
        assert_eq!(stats.period_start, stats.period_end);
        assert_eq!(stats.baseline_model, "claude-opus-4-1");
    }

    #[test]
    fn test_savings_against_baseline() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let flash = catalog.get("gemini-2.0-flash").unwrap();
        let sonnet = catalog.get("claude-sonnet-4-5").unwrap();
        let t0 = Utc::now();

        let entries = vec![
            entry(flash, Tier::Simple, 1_000_000, 0, 100, t0),
            entry(flash, Tier::Simple, 0, 1_000_000, 300, t0 + Duration::minutes(5)),
            entry(sonnet, Tier::Standard, 1_000_000, 1_000_000, 800, t0 - Duration::minutes(5)),
        ];
        let stats = compute_stats(&entries, baseline);

        // 0.10 + 0.40 + 18
        assert_eq!(stats.total_cost_usd, dec!(18.50));
        // 15 + 75 + 90
        assert_eq!(stats.counterfactual_cost_usd, dec!(180));
        assert_eq!(stats.savings_usd, dec!(161.50));
        assert_eq!(stats.savings_percent.round_dp(4), dec!(89.7222));
        assert_eq!(stats.avg_latency_ms, 400.0);
        assert_eq!(stats.period_start, t0 - Duration::minutes(5));
        assert_eq!(stats.period_end, t0 + Duration::minutes(5));

        assert_eq!(stats.by_model.len(), 2);
        assert_eq!(stats.by_model[0].model, "gemini-2.0-flash");
        assert_eq!(stats.by_model[0].requests, 2);
        assert_eq!(stats.by_model[0].cost_usd, dec!(0.50));

        assert_eq!(stats.by_tier.len(), 2);
        assert_eq!(stats.by_tier[0].tier, Tier::Simple);
        assert_eq!(stats.by_tier[0].requests, 2);
    }

    #[test]
    fn test_distribution_percentages_sum_to_hundred() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let now = Utc::now();
        let entries: Vec<_> = catalog
            .iter()
            .enumerate()
            .map(|(i, m)| entry(m, Tier::ALL[i % 3], 500, 200, 50, now))
            .collect();
        let stats = compute_stats(&entries, baseline);

        let model_total: f64 = stats.by_model.iter().map(|m| m.percent).sum();
        let tier_total: f64 = stats.by_tier.iter().map(|t| t.percent).sum();
        assert!((model_total - 100.0).abs() < 1e-9);
        assert!((tier_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_token_window_has_zero_savings_percent() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let entries = vec![entry(baseline, Tier::Complex, 0, 0, 10, Utc::now())];
        let stats = compute_stats(&entries, baseline);
        assert_eq!(stats.counterfactual_cost_usd, Decimal::ZERO);
        assert_eq!(stats.savings_percent, Decimal::ZERO);
    }

    #[test]
    fn test_all_baseline_traffic_saves_nothing() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let now = Utc::now();
        let entries: Vec<_> = (0..1000u64)
            .map(|i| {
                let input = (i * 37) % 5_000 + 1;
                let output = (i * 13) % 3_000 + 1;
                entry(baseline, Tier::Complex, input, output, 20, now)
            })
            .collect();
        let stats = compute_stats(&entries, baseline);

        // opus: $15/M in, $75/M out, summed in millionths of a dollar
        let micros: u64 = entries
            .iter()
            .map(|e| e.input_tokens * 15 + e.output_tokens * 75)
            .sum();
        let expected = Decimal::new(i64::try_from(micros).unwrap(), 6);

        assert_eq!(stats.total_requests, 1000);
        assert_eq!(stats.total_cost_usd, expected);
        assert_eq!(stats.counterfactual_cost_usd, expected);
        assert_eq!(stats.savings_usd, Decimal::ZERO);
        assert_eq!(stats.savings_percent, Decimal::ZERO);
        assert_eq!(stats.by_model.len(), 1);
        assert_eq!(stats.by_model[0].percent, 100.0);
    }

    #[test]
    fn test_report_mentions_baseline_and_models() {
        let catalog = ModelCatalog::builtin();
        let baseline = catalog.get("claude-opus-4-1").unwrap();
        let haiku = catalog.get("claude-haiku-4-5").unwrap();
        let entries = vec![entry(haiku, Tier::Simple, 1000, 1000, 200, Utc::now())];
        let report = compute_stats(&entries, baseline).to_string();
        assert!(report.contains("claude-opus-4-1"));
        assert!(report.contains("claude-haiku-4-5"));
        assert!(report.contains("simple"));
    }
}
