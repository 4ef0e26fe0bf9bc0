//! Cost-aware model routing.
//!
//! Turns a classifier result into a concrete model choice.
//!
//! # Architecture
//!
//! ```text
//! ClassificationResult ──┐
//!                        ▼
//!              ┌───────────────────┐
//!              │     Overrides     │  ← forced model, heartbeat, sub-agent
//!              └─────────┬─────────┘
//!                        │ tier (possibly stepped down)
//!                        ▼
//!              ┌───────────────────┐
//!   ModeCell ─▶│   Routing Table   │  ← (mode, tier) → preference list
//!              └─────────┬─────────┘
//!                        │ ordered candidates
//!                        ▼
//!              ┌───────────────────┐
//! ProviderSet ▶│ First available   │
//!              └─────────┬─────────┘
//!                        ▼
//!                 RoutingDecision
//! ```
//!
//! # Modes
//!
//! - **eco**: cheapest capable models first
//! - **standard**: balanced cost and quality
//! - **performance**: strongest models first

mod mode;
mod router;
mod table;

pub use mode::{ModeCell, RoutingMode};
pub use router::{OverrideKind, RouteOverrides, Router, RoutingDecision};
pub use table::{RoutingTable, RoutingTableConfig, TierPreferences, builtin_config};
