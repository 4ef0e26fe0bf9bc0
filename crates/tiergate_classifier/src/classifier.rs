//! Composite scoring and tier assignment.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::dimensions::{self, PromptSignals};
use crate::error::ClassifierConfigError;
use crate::tier::Tier;

/// One of the eight scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    TokenCount,
    CodePresence,
    ReasoningMarkers,
    SimpleIndicators,
    MultiStepPatterns,
    QuestionCount,
    SystemPromptSignals,
    ConversationDepth,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::TokenCount,
        Dimension::CodePresence,
        Dimension::ReasoningMarkers,
        Dimension::SimpleIndicators,
        Dimension::MultiStepPatterns,
        Dimension::QuestionCount,
        Dimension::SystemPromptSignals,
        Dimension::ConversationDepth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::TokenCount => "token_count",
            Dimension::CodePresence => "code_presence",
            Dimension::ReasoningMarkers => "reasoning_markers",
            Dimension::SimpleIndicators => "simple_indicators",
            Dimension::MultiStepPatterns => "multi_step_patterns",
            Dimension::QuestionCount => "question_count",
            Dimension::SystemPromptSignals => "system_prompt_signals",
            Dimension::ConversationDepth => "conversation_depth",
        }
    }

    fn score(self, signals: &PromptSignals, context: &ClassifyContext<'_>) -> f64 {
        match self {
            Dimension::TokenCount => signals.token_count(),
            Dimension::CodePresence => signals.code_presence(),
            Dimension::ReasoningMarkers => signals.reasoning_markers(),
            Dimension::SimpleIndicators => signals.simple_indicators(),
            Dimension::MultiStepPatterns => signals.multi_step_patterns(),
            Dimension::QuestionCount => signals.question_count(),
            Dimension::SystemPromptSignals => {
                dimensions::system_prompt_signals(context.system_prompt)
            }
            Dimension::ConversationDepth => dimensions::conversation_depth(context.message_count),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weight of each dimension in the composite score.
///
/// `simple_indicators` is negative: a greeting pulls the score down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScorerWeights {
    pub token_count: f64,
    pub code_presence: f64,
    pub reasoning_markers: f64,
    pub simple_indicators: f64,
    pub multi_step_patterns: f64,
    pub question_count: f64,
    pub system_prompt_signals: f64,
    pub conversation_depth: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            token_count: 0.15,
            code_presence: 0.20,
            reasoning_markers: 0.20,
            simple_indicators: -0.20,
            multi_step_patterns: 0.15,
            question_count: 0.05,
            system_prompt_signals: 0.10,
            conversation_depth: 0.15,
        }
    }
}

impl ScorerWeights {
    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::TokenCount => self.token_count,
            Dimension::CodePresence => self.code_presence,
            Dimension::ReasoningMarkers => self.reasoning_markers,
            Dimension::SimpleIndicators => self.simple_indicators,
            Dimension::MultiStepPatterns => self.multi_step_patterns,
            Dimension::QuestionCount => self.question_count,
            Dimension::SystemPromptSignals => self.system_prompt_signals,
            Dimension::ConversationDepth => self.conversation_depth,
        }
    }

    pub fn validate(&self) -> Result<(), ClassifierConfigError> {
        for dimension in Dimension::ALL {
            if !self.weight(dimension).is_finite() {
                return Err(ClassifierConfigError::NonFiniteWeight {
                    dimension: dimension.as_str(),
                });
            }
        }
        Ok(())
    }
}

/// Score boundaries between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierThresholds {
    /// Scores at or below this are `Simple`.
    pub simple_max: f64,
    /// Scores at or above this are `Complex`.
    pub complex_min: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            simple_max: 0.15,
            complex_min: 0.40,
        }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<(), ClassifierConfigError> {
        let ok = self.simple_max.is_finite()
            && self.complex_min.is_finite()
            && 0.0 <= self.simple_max
            && self.simple_max < self.complex_min
            && self.complex_min <= 1.0;
        if ok {
            Ok(())
        } else {
            Err(ClassifierConfigError::InvalidThresholds {
                simple_max: self.simple_max,
                complex_min: self.complex_min,
            })
        }
    }

    pub fn tier_for(&self, score: f64) -> Tier {
        if score <= self.simple_max {
            Tier::Simple
        } else if score >= self.complex_min {
            Tier::Complex
        } else {
            Tier::Standard
        }
    }
}

/// Request features other than the prompt itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext<'a> {
    pub system_prompt: Option<&'a str>,
    /// Messages in the conversation so far, including this one.
    pub message_count: Option<usize>,
}

/// Outcome of classifying one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Weighted composite, clamped to `[0, 1]`.
    pub score: f64,
    pub tier: Tier,
    /// Per-dimension scores, each in `[0, 1]`.
    pub breakdown: BTreeMap<Dimension, f64>,
    pub elapsed: Duration,
}

impl ClassificationResult {
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        self.breakdown.get(&dimension).copied().unwrap_or(0.0)
    }
}

/// Classify a prompt with explicit tuning.
pub fn classify(
    prompt: &str,
    context: &ClassifyContext<'_>,
    weights: &ScorerWeights,
    thresholds: &TierThresholds,
) -> ClassificationResult {
    let started = Instant::now();
    let signals = PromptSignals::scan(prompt);

    let mut breakdown = BTreeMap::new();
    let mut total = 0.0;
    for dimension in Dimension::ALL {
        let value = dimension.score(&signals, context);
        total += value * weights.weight(dimension);
        breakdown.insert(dimension, value);
    }

    let score = if total.is_nan() {
        0.0
    } else {
        total.clamp(0.0, 1.0)
    };
    let tier = thresholds.tier_for(score);
    let elapsed = started.elapsed();

    tracing::trace!(
        score,
        tier = tier.as_str(),
        elapsed_us = elapsed.as_micros() as u64,
        "classified prompt"
    );

    ClassificationResult {
        score,
        tier,
        breakdown,
        elapsed,
    }
}

/// Validated weights and thresholds, ready to classify.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    weights: ScorerWeights,
    thresholds: TierThresholds,
}

impl Classifier {
    pub fn new(
        weights: ScorerWeights,
        thresholds: TierThresholds,
    ) -> Result<Self, ClassifierConfigError> {
        weights.validate()?;
        thresholds.validate()?;
        Ok(Self {
            weights,
            thresholds,
        })
    }

    pub fn weights(&self) -> &ScorerWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    pub fn classify(&self, prompt: &str, context: &ClassifyContext<'_>) -> ClassificationResult {
        classify(prompt, context, &self.weights, &self.thresholds)
    }
}
