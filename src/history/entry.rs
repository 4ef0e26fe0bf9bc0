//! One line of the routing log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tiergate_classifier::Tier;
use uuid::Uuid;

use crate::llm::{OverrideKind, Provider, RoutingMode};

/// A completed, routed request as persisted in the JSONL log.
///
/// Unknown fields are ignored when reading, and every field added after the
/// first release is optional, so older and newer lines can share a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingLogEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Hex SHA-256 of the prompt. The prompt itself is never stored.
    pub prompt_hash: String,
    pub score: f64,
    pub tier: Tier,
    pub model: String,
    pub provider: Provider,
    pub mode: RoutingMode,
    #[serde(default)]
    pub override_kind: OverrideKind,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Estimated cost in USD, serialized as a decimal string.
    pub cost_usd: Decimal,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_request_id: Option<String>,
    /// Time spent classifying, in microseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_us: Option<u64>,
}

/// Hex-encoded SHA-256 digest of a prompt.
pub fn prompt_hash(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> RoutingLogEntry {
        RoutingLogEntry {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            prompt_hash: prompt_hash("hello"),
            score: 0.12,
            tier: Tier::Simple,
            model: "gpt-4o-mini".to_string(),
            provider: Provider::OpenAi,
            mode: RoutingMode::Eco,
            override_kind: OverrideKind::None,
            input_tokens: 12,
            output_tokens: 40,
            cost_usd: dec!(0.0000258),
            latency_ms: 310,
            parent_request_id: None,
            classification_us: Some(42),
        }
    }

    #[test]
    fn prompt_hash_is_stable_hex_sha256() {
        assert_eq!(
            prompt_hash("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(prompt_hash("").len(), 64);
    }

    #[test]
    fn entry_serializes_cost_as_string_and_omits_absent_parent() {
        let entry = sample();
        let value: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["cost_usd"], "0.0000258");
        assert_eq!(value["tier"], "simple");
        assert_eq!(value["override_kind"], "none");
        assert!(value.get("parent_request_id").is_none());
        assert!(value.get("prompt").is_none());
    }

    #[test]
    fn entry_tolerates_unknown_and_missing_optional_fields() {
        let line = r#"{
            "request_id": "6f1f4c39-4f8e-4a53-9a77-0b1b3d1e6f10",
            "timestamp": "2026-01-05T10:00:00Z",
            "prompt_hash": "ab",
            "score": 0.5,
            "tier": "complex",
            "model": "o3",
            "provider": "openai",
            "mode": "performance",
            "input_tokens": 100,
            "output_tokens": 200,
            "cost_usd": "0.0018",
            "latency_ms": 900,
            "added_in_a_later_version": {"nested": true}
        }"#;
        let entry: RoutingLogEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.override_kind, OverrideKind::None);
        assert_eq!(entry.cost_usd, dec!(0.0018));
        assert!(entry.classification_us.is_none());
    }
}
