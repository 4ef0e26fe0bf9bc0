//! Provider identities and the set of providers with configured credentials.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Upstream LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    OpenAi,
    Google,
    DeepSeek,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Google,
        Provider::DeepSeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Environment variables whose presence means this provider has
    /// credentials. Any one of them is enough.
    pub fn credential_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
            Self::OpenAi => &["OPENAI_API_KEY"],
            Self::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY"],
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "google" | "gemini" => Ok(Self::Google),
            "deepseek" | "deep_seek" => Ok(Self::DeepSeek),
            _ => Err(format!(
                "invalid provider '{s}', expected one of: anthropic, openai, google, deepseek"
            )),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Providers considered configured. Supplied to the router as an external
/// fact and refreshed by the surrounding process on startup or reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSet(BTreeSet<Provider>);

impl ProviderSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(Provider::ALL.into_iter().collect())
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.0.contains(&provider)
    }

    pub fn insert(&mut self, provider: Provider) -> bool {
        self.0.insert(provider)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Provider> + '_ {
        self.0.iter().copied()
    }

    /// Parse a comma-separated provider list, e.g. `anthropic,openai`.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<Provider>)
            .collect()
    }

    /// Detect providers from credential presence, using `lookup` to read
    /// variables so callers can supply something other than the process
    /// environment.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Provider::ALL
            .into_iter()
            .filter(|provider| {
                provider
                    .credential_env_vars()
                    .iter()
                    .any(|var| lookup(var).is_some_and(|v| !v.trim().is_empty()))
            })
            .collect()
    }
}

impl FromIterator<Provider> for ProviderSet {
    fn from_iter<I: IntoIterator<Item = Provider>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.0.iter().map(Provider::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}
