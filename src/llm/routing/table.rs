//! Routing table: ordered model preferences per (mode, tier).
//!
//! The table is validated against the catalog once at load. Every cell must
//! exist, be non-empty, and reference only catalog models. Models whose
//! provider is unavailable stay in the table and are skipped at selection
//! time by the router.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tiergate_classifier::Tier;

use crate::error::ConfigError;
use crate::llm::catalog::ModelCatalog;
use crate::llm::routing::mode::RoutingMode;

/// Preference lists for each tier of one mode. An absent key is an empty
/// list, which fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierPreferences {
    #[serde(default)]
    pub simple: Vec<String>,
    #[serde(default)]
    pub standard: Vec<String>,
    #[serde(default)]
    pub complex: Vec<String>,
}

impl TierPreferences {
    pub fn get(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Simple => &self.simple,
            Tier::Standard => &self.standard,
            Tier::Complex => &self.complex,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Vec<String> {
        match tier {
            Tier::Simple => &mut self.simple,
            Tier::Standard => &mut self.standard,
            Tier::Complex => &mut self.complex,
        }
    }
}

/// Shape of the `[routing]` section of the config file:
///
/// ```toml
/// [routing.eco]
/// simple = ["gemini-2.0-flash", "gpt-4o-mini"]
/// standard = ["deepseek-chat"]
/// complex = ["deepseek-reasoner", "gemini-2.5-pro"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingTableConfig {
    #[serde(default)]
    pub eco: TierPreferences,
    #[serde(default)]
    pub standard: TierPreferences,
    #[serde(default)]
    pub performance: TierPreferences,
}

impl RoutingTableConfig {
    pub fn mode(&self, mode: RoutingMode) -> &TierPreferences {
        match mode {
            RoutingMode::Eco => &self.eco,
            RoutingMode::Standard => &self.standard,
            RoutingMode::Performance => &self.performance,
        }
    }

    pub fn mode_mut(&mut self, mode: RoutingMode) -> &mut TierPreferences {
        match mode {
            RoutingMode::Eco => &mut self.eco,
            RoutingMode::Standard => &mut self.standard,
            RoutingMode::Performance => &mut self.performance,
        }
    }
}

/// Validated (mode, tier) → preference list mapping.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    cells: HashMap<(RoutingMode, Tier), Vec<String>>,
}

impl RoutingTable {
    /// Validate `config` against `catalog`. Model references may carry a
    /// `provider/` prefix; they are stored as bare catalog ids.
    pub fn from_config(
        config: &RoutingTableConfig,
        catalog: &ModelCatalog,
    ) -> Result<Self, ConfigError> {
        let mut cells = HashMap::with_capacity(RoutingMode::ALL.len() * Tier::ALL.len());

        for mode in RoutingMode::ALL {
            for tier in Tier::ALL {
                let list = config.mode(mode).get(tier);
                if list.is_empty() {
                    return Err(ConfigError::MissingRoute { mode, tier });
                }

                let resolved = list
                    .iter()
                    .map(|model| {
                        catalog.get(model).map(|spec| spec.id.clone()).ok_or_else(|| {
                            ConfigError::UnknownRouteModel {
                                mode,
                                tier,
                                model: model.clone(),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                cells.insert((mode, tier), resolved);
            }
        }

        Ok(Self { cells })
    }

    /// The built-in preference lists, validated against `catalog`.
    pub fn builtin(catalog: &ModelCatalog) -> Result<Self, ConfigError> {
        Self::from_config(&builtin_config(), catalog)
    }

    /// Ordered candidates for a cell. Never empty once constructed.
    pub fn preferences(&self, mode: RoutingMode, tier: Tier) -> &[String] {
        self.cells
            .get(&(mode, tier))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Preference lists shipped with the binary.
pub fn builtin_config() -> RoutingTableConfig {
    fn prefs(simple: &[&str], standard: &[&str], complex: &[&str]) -> TierPreferences {
        let owned = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        TierPreferences {
            simple: owned(simple),
            standard: owned(standard),
            complex: owned(complex),
        }
    }

    RoutingTableConfig {
        eco: prefs(
            &["gemini-2.0-flash", "gpt-4o-mini", "deepseek-chat", "claude-haiku-4-5"],
            &["deepseek-chat", "gpt-4o-mini", "gemini-2.0-flash", "claude-haiku-4-5"],
            &["deepseek-reasoner", "gemini-2.5-pro", "claude-sonnet-4-5", "gpt-4o"],
        ),
        standard: prefs(
            &["claude-haiku-4-5", "gpt-4o-mini", "gemini-2.0-flash", "deepseek-chat"],
            &["claude-sonnet-4-5", "gpt-4o", "gemini-2.5-pro", "deepseek-chat"],
            &["claude-sonnet-4-5", "o3", "gemini-2.5-pro", "deepseek-reasoner"],
        ),
        performance: prefs(
            &["claude-sonnet-4-5", "gpt-4o", "gemini-2.5-pro", "deepseek-chat"],
            &["claude-sonnet-4-5", "o3", "gemini-2.5-pro", "deepseek-reasoner"],
            &["claude-opus-4-1", "o3", "gemini-2.5-pro", "deepseek-reasoner"],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_complete() {
        let catalog = ModelCatalog::builtin();
        let table = RoutingTable::builtin(&catalog).unwrap();
        for mode in RoutingMode::ALL {
            for tier in Tier::ALL {
                assert!(!table.preferences(mode, tier).is_empty(), "{mode}/{tier}");
            }
        }
        assert_eq!(
            table.preferences(RoutingMode::Performance, Tier::Complex)[0],
            "claude-opus-4-1"
        );
    }

    #[test]
    fn missing_cell_fails_at_load() {
        let catalog = ModelCatalog::builtin();
        let mut config = builtin_config();
        config.mode_mut(RoutingMode::Eco).get_mut(Tier::Standard).clear();

        let err = RoutingTable::from_config(&config, &catalog).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRoute {
                mode: RoutingMode::Eco,
                tier: Tier::Standard
            }
        ));
    }

    #[test]
    fn unknown_model_fails_at_load() {
        let catalog = ModelCatalog::builtin();
        let mut config = builtin_config();
        *config.mode_mut(RoutingMode::Standard).get_mut(Tier::Complex) = vec!["gpt-7".to_string()];

        let err = RoutingTable::from_config(&config, &catalog).unwrap_err();
        assert!(err.to_string().contains("gpt-7"));
    }

    #[test]
    fn mismatched_provider_prefix_fails_at_load() {
        let catalog = ModelCatalog::builtin();
        let mut config = builtin_config();
        *config.mode_mut(RoutingMode::Eco).get_mut(Tier::Simple) =
            vec!["anthropic/gpt-4o".to_string()];

        let err = RoutingTable::from_config(&config, &catalog).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRouteModel { .. }));
        assert!(err.to_string().contains("anthropic/gpt-4o"));
    }

    #[test]
    fn provider_prefixed_refs_are_normalised() {
        let catalog = ModelCatalog::builtin();
        let mut config = builtin_config();
        *config.mode_mut(RoutingMode::Eco).get_mut(Tier::Simple) =
            vec!["google/gemini-2.0-flash".to_string()];

        let table = RoutingTable::from_config(&config, &catalog).unwrap();
        assert_eq!(
            table.preferences(RoutingMode::Eco, Tier::Simple),
            ["gemini-2.0-flash".to_string()]
        );
    }

    #[test]
    fn routing_section_parses_from_toml() {
        let config: RoutingTableConfig = toml::from_str(
            r#"
            [eco]
            simple = ["gpt-4o-mini"]
            standard = ["deepseek-chat"]
            complex = ["o3"]
            "#,
        )
        .unwrap();
        assert_eq!(config.eco.complex, vec!["o3".to_string()]);
        assert!(config.performance.simple.is_empty());
    }

    #[test]
    fn misspelled_tier_is_rejected() {
        let parsed: Result<RoutingTableConfig, _> = toml::from_str(
            r#"
            [eco]
            simpel = ["gpt-4o-mini"]
            "#,
        );
        assert!(parsed.is_err());
    }
}
