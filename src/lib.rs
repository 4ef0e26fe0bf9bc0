//! tiergate: prompt complexity classification and cost-aware model routing.
//!
//! Given an LLM request, tiergate decides which model should serve it,
//! estimates what that cost, and records the decision in an append-only
//! log that feeds usage and savings reports.
//!
//! ```text
//! RouteRequest ─▶ Classifier ─▶ Router ─▶ RoutingDecision ─▶ [dispatch]
//!                                  ▲                             │
//!                     catalog, table, mode, providers            ▼
//!                                                       record_completion
//!                                                                │
//!                                                                ▼
//!                                                       routing.jsonl ─▶ stats
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod llm;

pub use config::Config;
pub use engine::{RouteRequest, RoutedRequest, RoutingEngine};
pub use error::{Error, Result};
pub use tiergate_classifier::{ClassificationResult, Tier};
