//! Prompt complexity classification for cost-aware model routing.
//!
//! Scores a request across eight independent dimensions, combines them with
//! configurable weights, and maps the composite score to a [`Tier`].
//!
//! # Architecture
//!
//! ```text
//! Prompt + context
//!      │
//!      ▼
//! ┌──────────────────┐
//! │ Dimension scorers │  ← 8 closed-form scores in [0, 1]
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Weighted sum    │  ← ScorerWeights, clamped to [0, 1]
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Tier thresholds  │  ← simple / standard / complex
//! └──────────────────┘
//! ```
//!
//! Everything here is pure and allocation-light: no I/O, no locks, pattern
//! automata compiled once per process and shared by every scorer.
//!
//! # Usage
//!
//! ```rust
//! use tiergate_classifier::{classify, ClassifyContext, ScorerWeights, Tier, TierThresholds};
//!
//! let result = classify(
//!     "hello",
//!     &ClassifyContext::default(),
//!     &ScorerWeights::default(),
//!     &TierThresholds::default(),
//! );
//! assert_eq!(result.tier, Tier::Simple);
//! ```

mod classifier;
pub mod dimensions;
mod error;
mod tier;

pub use classifier::{
    ClassificationResult, Classifier, ClassifyContext, Dimension, ScorerWeights, TierThresholds,
    classify,
};
pub use error::ClassifierConfigError;
pub use tier::Tier;
