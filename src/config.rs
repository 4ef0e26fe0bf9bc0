//! Configuration for tiergate.
//!
//! Sources, highest precedence first:
//! 1. environment variables (a `.env` file is loaded if present)
//! 2. the TOML file named by `TIERGATE_CONFIG`
//! 3. built-in defaults
//!
//! Every value is validated here. A config that loads is one the router can
//! serve from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tiergate_classifier::{Classifier, ScorerWeights, TierThresholds};

use crate::error::ConfigError;
use crate::llm::{
    DEFAULT_BASELINE_MODEL, ModelCatalog, ModelSpec, ProviderSet, RoutingMode, RoutingTable,
    RoutingTableConfig,
};

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSONL routing log location.
    pub log_path: PathBuf,
    /// Mode the process starts in.
    pub default_mode: RoutingMode,
    /// Providers with credentials.
    pub providers: ProviderSet,
    /// Catalog id of the counterfactual baseline.
    pub baseline_model: String,
    pub classifier: Classifier,
    pub catalog: ModelCatalog,
    pub routing: RoutingTable,
}

/// `[classifier]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierSection {
    #[serde(default)]
    pub weights: ScorerWeights,
    #[serde(default)]
    pub thresholds: TierThresholds,
}

/// On-disk shape of the routing config file.
///
/// ```toml
/// default_mode = "eco"
/// baseline_model = "claude-opus-4-1"
///
/// [classifier.thresholds]
/// simple_max = 0.2
///
/// [[models]]
/// id = "deepseek-chat"
/// provider = "deepseek"
/// input_cost_per_mtok = "0.27"
/// output_cost_per_mtok = "1.10"
/// capability_tier = "standard"
///
/// [routing.eco]
/// simple = ["gemini-2.0-flash", "gpt-4o-mini"]
/// standard = ["deepseek-chat"]
/// complex = ["deepseek-reasoner"]
/// # ... every (mode, tier) cell when [routing] is given
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterFileConfig {
    pub default_mode: Option<RoutingMode>,
    pub baseline_model: Option<String>,
    pub log_path: Option<PathBuf>,
    #[serde(default)]
    pub classifier: ClassifierSection,
    /// Added to the built-in catalog. An entry whose id matches a built-in
    /// model replaces it.
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    /// Replaces the built-in routing table. Must cover every cell.
    pub routing: Option<RoutingTableConfig>,
}

impl RouterFileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl Config {
    /// Load configuration from environment variables and the optional
    /// config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let file = match optional_env("TIERGATE_CONFIG")? {
            Some(path) => {
                let path = PathBuf::from(path);
                tracing::debug!(path = %path.display(), "Loading routing config file");
                RouterFileConfig::load(&path)?
            }
            None => RouterFileConfig::default(),
        };

        let mut config = Self::from_file_config(file)?;

        if let Some(path) = optional_env("TIERGATE_LOG_PATH")? {
            config.log_path = PathBuf::from(path);
        }
        config.default_mode = parse_optional_env("TIERGATE_MODE", config.default_mode)?;
        if let Some(baseline) = optional_env("TIERGATE_BASELINE_MODEL")? {
            config.baseline_model = resolve_baseline(&config.catalog, &baseline)?;
        }
        config.providers = match optional_env("TIERGATE_PROVIDERS")? {
            Some(list) => {
                ProviderSet::parse_list(&list).map_err(|message| ConfigError::InvalidValue {
                    key: "TIERGATE_PROVIDERS".to_string(),
                    message,
                })?
            }
            None => ProviderSet::detect(|key| optional_env(key).ok().flatten()),
        };

        if config.providers.is_empty() {
            tracing::warn!(
                "No provider credentials found; every routing request will fail until one is configured"
            );
        }

        Ok(config)
    }

    /// Resolve a parsed config file against the built-in defaults. Provider
    /// availability starts empty; [`Config::from_env`] fills it in.
    pub fn from_file_config(file: RouterFileConfig) -> Result<Self, ConfigError> {
        let classifier = Classifier::new(file.classifier.weights, file.classifier.thresholds)?;
        let catalog = merge_catalog(file.models)?;
        let routing = match &file.routing {
            Some(table) => RoutingTable::from_config(table, &catalog)?,
            None => RoutingTable::builtin(&catalog)?,
        };
        let baseline_model = resolve_baseline(
            &catalog,
            file.baseline_model.as_deref().unwrap_or(DEFAULT_BASELINE_MODEL),
        )?;
        let log_path = match file.log_path {
            Some(path) => path,
            None => default_log_path()?,
        };

        Ok(Self {
            log_path,
            default_mode: file.default_mode.unwrap_or_default(),
            providers: ProviderSet::empty(),
            baseline_model,
            classifier,
            catalog,
            routing,
        })
    }

    /// Built-in catalog, table and classifier settings.
    pub fn builtin(log_path: impl Into<PathBuf>, providers: ProviderSet) -> Self {
        let catalog = ModelCatalog::builtin();
        let routing = RoutingTable::builtin(&catalog).expect("built-in routing table is valid");
        Self {
            log_path: log_path.into(),
            default_mode: RoutingMode::default(),
            providers,
            baseline_model: DEFAULT_BASELINE_MODEL.to_string(),
            classifier: Classifier::default(),
            catalog,
            routing,
        }
    }
}

/// `~/.tiergate`, the default base directory.
pub fn tiergate_base_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tiergate"))
}

fn default_log_path() -> Result<PathBuf, ConfigError> {
    tiergate_base_dir()
        .map(|dir| dir.join("routing.jsonl"))
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "TIERGATE_LOG_PATH".to_string(),
            message: "no home directory found; set TIERGATE_LOG_PATH".to_string(),
        })
}

fn merge_catalog(overrides: Vec<ModelSpec>) -> Result<ModelCatalog, ConfigError> {
    let mut seen = HashSet::new();
    for model in &overrides {
        if !seen.insert(model.id.as_str()) {
            return Err(ConfigError::InvalidModel {
                model: model.id.clone(),
                reason: "defined more than once in [[models]]".to_string(),
            });
        }
    }

    let mut models: Vec<ModelSpec> = ModelCatalog::builtin().iter().cloned().collect();
    for model in overrides {
        match models.iter_mut().find(|m| m.id == model.id) {
            Some(existing) => *existing = model,
            None => models.push(model),
        }
    }
    ModelCatalog::new(models)
}

fn resolve_baseline(catalog: &ModelCatalog, id: &str) -> Result<String, ConfigError> {
    catalog
        .get(id)
        .map(|m| m.id.clone())
        .ok_or_else(|| ConfigError::UnknownBaseline(id.to_string()))
}

// Helper functions

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!("failed to read {key}: {e}"))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}
