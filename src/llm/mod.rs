//! Model catalog, cost estimation and routing.
//!
//! Providers supported by the built-in catalog:
//! - **Anthropic**: Claude Haiku, Sonnet, Opus
//! - **OpenAI**: GPT-4o mini, GPT-4o, o3
//! - **Google**: Gemini Flash and Pro
//! - **DeepSeek**: V3 chat and R1 reasoner

mod catalog;
pub mod costs;
mod provider;
pub mod routing;

pub use catalog::{Capability, DEFAULT_BASELINE_MODEL, ModelCatalog, ModelSpec};
pub use provider::{Provider, ProviderSet};
pub use routing::{
    ModeCell, OverrideKind, RouteOverrides, Router, RoutingDecision, RoutingMode, RoutingTable,
    RoutingTableConfig,
};
