//! Static model catalog: identifiers, pricing and capabilities.
//!
//! The catalog is the single source of pricing for both per-request cost
//! estimation and the counterfactual baseline used in savings reports.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tiergate_classifier::Tier;

use crate::error::ConfigError;
use crate::llm::provider::{Provider, ProviderSet};

/// Model id of the premium model used as the counterfactual baseline when
/// none is configured.
pub const DEFAULT_BASELINE_MODEL: &str = "claude-opus-4-1";

/// What a model is declared fit for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Chat,
    Code,
    Analysis,
    Summarize,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Code => "code",
            Self::Analysis => "analysis",
            Self::Summarize => "summarize",
        }
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" | "general" => Ok(Self::Chat),
            "code" => Ok(Self::Code),
            "analysis" => Ok(Self::Analysis),
            "summarize" | "summarise" => Ok(Self::Summarize),
            _ => Err(format!(
                "invalid capability '{s}', expected one of: chat, code, analysis, summarize"
            )),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_capabilities() -> Vec<Capability> {
    vec![Capability::Chat]
}

/// A routable (provider, model) pair and its pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    /// Identifier sent to the provider, e.g. `claude-sonnet-4-5`.
    pub id: String,
    pub provider: Provider,
    #[serde(default)]
    pub display_name: String,
    /// USD per million input tokens.
    pub input_cost_per_mtok: Decimal,
    /// USD per million output tokens.
    pub output_cost_per_mtok: Decimal,
    /// The most demanding tier this model is intended for.
    pub capability_tier: Tier,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,
}

impl ModelSpec {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Input plus output price, used to rank models by cheapness.
    pub fn blended_cost_per_mtok(&self) -> Decimal {
        self.input_cost_per_mtok + self.output_cost_per_mtok
    }

    fn display(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display(), self.provider)
    }
}

/// Immutable registry of every routable model.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelSpec>,
    index: HashMap<String, usize>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting empty, duplicate, or negatively priced
    /// entries.
    pub fn new(models: Vec<ModelSpec>) -> Result<Self, ConfigError> {
        if models.is_empty() {
            return Err(ConfigError::InvalidModel {
                model: "<catalog>".to_string(),
                reason: "catalog has no models".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(models.len());
        for (i, model) in models.iter().enumerate() {
            if model.id.trim().is_empty() {
                return Err(ConfigError::InvalidModel {
                    model: format!("#{i}"),
                    reason: "model id is empty".to_string(),
                });
            }
            if model.input_cost_per_mtok.is_sign_negative()
                || model.output_cost_per_mtok.is_sign_negative()
            {
                return Err(ConfigError::InvalidModel {
                    model: model.id.clone(),
                    reason: "prices must not be negative".to_string(),
                });
            }
            if model.capabilities.is_empty() {
                return Err(ConfigError::InvalidModel {
                    model: model.id.clone(),
                    reason: "at least one capability is required".to_string(),
                });
            }
            if index.insert(model.id.clone(), i).is_some() {
                return Err(ConfigError::InvalidModel {
                    model: model.id.clone(),
                    reason: "duplicate model id".to_string(),
                });
            }
        }

        Ok(Self { models, index })
    }

    /// The built-in catalog, current list prices in USD per million tokens.
    pub fn builtin() -> Self {
        use Capability::*;

        let spec = |provider, id: &str, name: &str, input, output, tier, caps: &[Capability]| {
            ModelSpec {
                id: id.to_string(),
                provider,
                display_name: name.to_string(),
                input_cost_per_mtok: input,
                output_cost_per_mtok: output,
                capability_tier: tier,
                capabilities: caps.to_vec(),
            }
        };

        let models = vec![
            spec(
                Provider::Anthropic,
                "claude-haiku-4-5",
                "Claude Haiku 4.5",
                dec!(1.00),
                dec!(5.00),
                Tier::Simple,
                &[Chat, Code, Summarize],
            ),
            spec(
                Provider::Anthropic,
                "claude-sonnet-4-5",
                "Claude Sonnet 4.5",
                dec!(3.00),
                dec!(15.00),
                Tier::Standard,
                &[Chat, Code, Analysis, Summarize],
            ),
            spec(
                Provider::Anthropic,
                "claude-opus-4-1",
                "Claude Opus 4.1",
                dec!(15.00),
                dec!(75.00),
                Tier::Complex,
                &[Chat, Code, Analysis, Summarize],
            ),
            spec(
                Provider::OpenAi,
                "gpt-4o-mini",
                "GPT-4o mini",
                dec!(0.15),
                dec!(0.60),
                Tier::Simple,
                &[Chat, Code, Summarize],
            ),
            spec(
                Provider::OpenAi,
                "gpt-4o",
                "GPT-4o",
                dec!(2.50),
                dec!(10.00),
                Tier::Standard,
                &[Chat, Code, Analysis, Summarize],
            ),
            spec(
                Provider::OpenAi,
                "o3",
                "o3",
                dec!(2.00),
                dec!(8.00),
                Tier::Complex,
                &[Chat, Code, Analysis],
            ),
            spec(
                Provider::Google,
                "gemini-2.0-flash",
                "Gemini 2.0 Flash",
                dec!(0.10),
                dec!(0.40),
                Tier::Simple,
                &[Chat, Summarize],
            ),
            spec(
                Provider::Google,
                "gemini-2.5-pro",
                "Gemini 2.5 Pro",
                dec!(1.25),
                dec!(10.00),
                Tier::Complex,
                &[Chat, Code, Analysis, Summarize],
            ),
            spec(
                Provider::DeepSeek,
                "deepseek-chat",
                "DeepSeek V3",
                dec!(0.27),
                dec!(1.10),
                Tier::Standard,
                &[Chat, Code, Summarize],
            ),
            spec(
                Provider::DeepSeek,
                "deepseek-reasoner",
                "DeepSeek R1",
                dec!(0.55),
                dec!(2.19),
                Tier::Complex,
                &[Chat, Code, Analysis],
            ),
        ];

        Self::new(models).expect("built-in catalog is valid")
    }

    /// Look up a model by id. A `provider/` prefix is accepted, e.g.
    /// `openai/gpt-4o`, and must name the model's own provider.
    pub fn get(&self, model_id: &str) -> Option<&ModelSpec> {
        if let Some(&idx) = self.index.get(model_id) {
            return self.models.get(idx);
        }
        let (prefix, name) = model_id.split_once('/')?;
        let provider: Provider = prefix.parse().ok()?;
        self.index
            .get(name)
            .and_then(|&idx| self.models.get(idx))
            .filter(|spec| spec.provider == provider)
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.get(model_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Cheapest model, by blended price, whose provider is available and
    /// which has `capability` when one is required. Catalog order breaks
    /// ties.
    pub fn cheapest(
        &self,
        available: &ProviderSet,
        capability: Option<Capability>,
    ) -> Option<&ModelSpec> {
        self.models
            .iter()
            .filter(|m| available.contains(m.provider))
            .filter(|m| capability.is_none_or(|c| m.has_capability(c)))
            .min_by_key(|m| m.blended_cost_per_mtok())
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
