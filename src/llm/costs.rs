//! Per-request cost estimation from catalog pricing.
//!
//! Costs are computed with `Decimal` so aggregated totals stay exact to the
//! cent and below.

use rust_decimal::Decimal;

use crate::llm::catalog::ModelSpec;

const TOKENS_PER_MTOK: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Estimated USD cost of a completion on `model`.
pub fn estimate(model: &ModelSpec, input_tokens: u64, output_tokens: u64) -> Decimal {
    let input = Decimal::from(input_tokens) * model.input_cost_per_mtok;
    let output = Decimal::from(output_tokens) * model.output_cost_per_mtok;
    (input + output) / TOKENS_PER_MTOK
}

/// Cost the same token counts would have incurred on `baseline`. Used for
/// savings reports.
pub fn counterfactual(baseline: &ModelSpec, input_tokens: u64, output_tokens: u64) -> Decimal {
    estimate(baseline, input_tokens, output_tokens)
}
