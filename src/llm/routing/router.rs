//! Model router: turns a classification into a concrete model choice.
//!
//! Precedence, highest first:
//! 1. forced model
//! 2. heartbeat (cheapest available model)
//! 3. sub-agent step-down (tier drops one level before lookup)
//! 4. (mode, tier) preference list, first available provider wins
//!
//! The router never substitutes a model from another tier. An exhausted
//! preference list is a [`RoutingError::NoCapableProvider`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tiergate_classifier::{ClassificationResult, Tier};

use crate::error::RoutingError;
use crate::llm::catalog::{Capability, ModelCatalog, ModelSpec};
use crate::llm::provider::{Provider, ProviderSet};
use crate::llm::routing::mode::RoutingMode;
use crate::llm::routing::table::RoutingTable;

/// Request-level overrides supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOverrides {
    /// Pin the request to this model id (optionally `provider/model`).
    pub force_model: Option<String>,
    /// Background keep-alive traffic; always served by the cheapest model.
    pub heartbeat: bool,
    /// Set for sub-agent calls. Steps the tier down one level.
    pub parent_request_id: Option<String>,
    /// Only consider models declaring this capability.
    pub require_capability: Option<Capability>,
}

/// Which override, if any, shaped the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideKind {
    #[default]
    None,
    Forced,
    Heartbeat,
    SubagentStepdown,
}

impl OverrideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forced => "forced",
            Self::Heartbeat => "heartbeat",
            Self::SubagentStepdown => "subagent-stepdown",
        }
    }
}

impl std::fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of routing a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    /// Selected model.
    pub model: ModelSpec,
    /// Tier used for the lookup, after any step-down.
    pub tier: Tier,
    /// Tier the classifier produced.
    pub classified_tier: Tier,
    /// Composite classifier score.
    pub score: f64,
    pub mode: RoutingMode,
    pub override_kind: OverrideKind,
    /// Human-readable reason for this decision.
    pub reason: String,
}

impl RoutingDecision {
    pub fn provider(&self) -> Provider {
        self.model.provider
    }
}

/// Stateless router over a catalog and routing table.
#[derive(Debug, Clone)]
pub struct Router {
    catalog: Arc<ModelCatalog>,
    table: Arc<RoutingTable>,
}

impl Router {
    pub fn new(catalog: Arc<ModelCatalog>, table: Arc<RoutingTable>) -> Self {
        Self { catalog, table }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Catalog entries of a (mode, tier) preference list, in order.
    pub fn preferences(&self, mode: RoutingMode, tier: Tier) -> Vec<&ModelSpec> {
        self.table
            .preferences(mode, tier)
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    /// Route a classified request.
    ///
    /// Pure function of its arguments: same inputs, same decision.
    pub fn route(
        &self,
        classification: &ClassificationResult,
        mode: RoutingMode,
        overrides: &RouteOverrides,
        available: &ProviderSet,
    ) -> Result<RoutingDecision, RoutingError> {
        let classified_tier = classification.tier;
        let score = classification.score;

        let decision = |model: &ModelSpec, tier, override_kind, reason: String| RoutingDecision {
            model: model.clone(),
            tier,
            classified_tier,
            score,
            mode,
            override_kind,
            reason,
        };

        if let Some(forced) = overrides.force_model.as_deref() {
            let model = self
                .catalog
                .get(forced)
                .ok_or_else(|| RoutingError::UnknownModel(forced.to_string()))?;
            if !available.contains(model.provider) {
                return Err(RoutingError::NoCapableProvider {
                    mode,
                    tier: classified_tier,
                    tried: vec![model.provider],
                    required: None,
                });
            }
            let reason = format!("forced model {} (classified {classified_tier})", model.id);
            return Ok(decision(model, classified_tier, OverrideKind::Forced, reason));
        }

        if overrides.heartbeat {
            let model = self
                .catalog
                .cheapest(available, overrides.require_capability)
                .ok_or_else(|| RoutingError::NoCapableProvider {
                    mode,
                    tier: classified_tier,
                    tried: distinct_providers(self.catalog.iter().filter(|m| {
                        capability_matches(m, overrides.require_capability)
                    })),
                    required: overrides.require_capability,
                })?;
            let reason = format!("heartbeat → cheapest available model {}", model.id);
            return Ok(decision(model, classified_tier, OverrideKind::Heartbeat, reason));
        }

        let (tier, override_kind) = if overrides.parent_request_id.is_some() {
            (classified_tier.step_down(), OverrideKind::SubagentStepdown)
        } else {
            (classified_tier, OverrideKind::None)
        };

        let candidates: Vec<&ModelSpec> = self
            .preferences(mode, tier)
            .into_iter()
            .filter(|m| capability_matches(m, overrides.require_capability))
            .collect();

        let Some(model) = candidates
            .iter()
            .copied()
            .find(|m| available.contains(m.provider))
        else {
            let tried = distinct_providers(candidates.iter().copied());
            tracing::warn!(
                mode = %mode,
                tier = %tier,
                available = %available,
                required = ?overrides.require_capability,
                "No capable provider for routing cell"
            );
            return Err(RoutingError::NoCapableProvider {
                mode,
                tier,
                tried,
                required: overrides.require_capability,
            });
        };

        let mut reason = format!(
            "{classified_tier} complexity (score={score:.2}) in {mode} mode → {}",
            model.id
        );
        if override_kind == OverrideKind::SubagentStepdown {
            reason.push_str(&format!(" (sub-agent step-down from {classified_tier} to {tier})"));
        }
        if let Some(capability) = overrides.require_capability {
            reason.push_str(&format!(" [requires {capability}]"));
        }

        tracing::debug!(
            model = %model.id,
            tier = %tier,
            mode = %mode,
            override_kind = %override_kind,
            "Routed request"
        );

        Ok(decision(model, tier, override_kind, reason))
    }
}

fn capability_matches(model: &ModelSpec, required: Option<Capability>) -> bool {
    required.is_none_or(|c| model.has_capability(c))
}

/// Providers in first-seen order, without repeats.
fn distinct_providers<'a>(models: impl Iterator<Item = &'a ModelSpec>) -> Vec<Provider> {
    let mut seen = Vec::new();
    for model in models {
        if !seen.contains(&model.provider) {
            seen.push(model.provider);
        }
    }
    seen
}
