//! Error types for tiergate.

use std::path::PathBuf;

use tiergate_classifier::{ClassifierConfigError, Tier};

use crate::llm::{Capability, Provider, RoutingMode};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Routing log error: {0}")]
    Log(#[from] LogError),
}

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing routing table entry for mode {mode}, tier {tier}")]
    MissingRoute { mode: RoutingMode, tier: Tier },

    #[error("Routing table entry for mode {mode}, tier {tier} references unknown model {model}")]
    UnknownRouteModel {
        mode: RoutingMode,
        tier: Tier,
        model: String,
    },

    #[error("Invalid catalog entry {model}: {reason}")]
    InvalidModel { model: String, reason: String },

    #[error("Baseline model {0} is not in the catalog")]
    UnknownBaseline(String),

    #[error("Invalid classifier settings: {0}")]
    Classifier(#[from] ClassifierConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Routing failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error(
        "No capable provider configured for mode {mode}, tier {tier} (tried: {}{})",
        format_providers(tried),
        format_requirement(required)
    )]
    NoCapableProvider {
        mode: RoutingMode,
        tier: Tier,
        tried: Vec<Provider>,
        /// Capability the candidates were filtered on, if any.
        required: Option<Capability>,
    },

    #[error("Model {0} is not in the catalog")]
    UnknownModel(String),
}

/// Routing log failures. Recovered where they happen and never propagated
/// into the routing decision.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to append to routing log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read routing log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize routing log entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn format_providers(providers: &[Provider]) -> String {
    if providers.is_empty() {
        return "none".to_string();
    }
    providers
        .iter()
        .map(Provider::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_requirement(required: &Option<Capability>) -> String {
    required
        .map(|capability| format!("; requires {capability}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
