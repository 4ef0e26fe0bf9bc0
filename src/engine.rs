//! Routing engine: the request path and the operator read surface.
//!
//! The request path is split in two so the caller can dispatch in between:
//!
//! ```text
//! decide()  ── classify + route, pure, no I/O
//!     │
//!     ▼
//! [caller dispatches to the chosen provider]
//!     │
//!     ▼
//! record_completion()  ── estimate cost, enqueue log entry
//! ```

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use tiergate_classifier::{ClassificationResult, Classifier, ClassifyContext, Tier};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ConfigError, LogError, Result, RoutingError};
use crate::history::{
    AggregateStats, LogScan, RoutingLogEntry, RoutingLogReader, RoutingLogSink, RoutingLogWriter,
    compute_stats, prompt_hash,
};
use crate::llm::costs;
use crate::llm::{
    Capability, ModeCell, ModelCatalog, ModelSpec, ProviderSet, RouteOverrides, Router,
    RoutingDecision, RoutingMode,
};

/// An inbound request as seen by the engine.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    /// Messages in the conversation so far, including this one.
    pub message_count: Option<usize>,
    /// Set when the request comes from a sub-agent.
    pub parent_request_id: Option<String>,
    pub force_model: Option<String>,
    pub heartbeat: bool,
    pub require_capability: Option<Capability>,
}

impl RouteRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    fn overrides(&self) -> RouteOverrides {
        RouteOverrides {
            force_model: self.force_model.clone(),
            heartbeat: self.heartbeat,
            parent_request_id: self.parent_request_id.clone(),
            require_capability: self.require_capability,
        }
    }
}

/// A routed request awaiting dispatch.
#[derive(Debug, Clone)]
pub struct RoutedRequest {
    pub request_id: Uuid,
    pub prompt_hash: String,
    pub parent_request_id: Option<String>,
    pub classification: ClassificationResult,
    pub decision: RoutingDecision,
}

/// Classifier, router, mode cell and routing log behind one handle.
pub struct RoutingEngine {
    classifier: Classifier,
    router: Router,
    mode: ModeCell,
    providers: RwLock<ProviderSet>,
    baseline_model: String,
    sink: Arc<dyn RoutingLogSink>,
    reader: RoutingLogReader,
}

impl RoutingEngine {
    /// Build an engine that records to `sink` and reads from the log at
    /// `config.log_path`.
    pub fn new(config: Config, sink: Arc<dyn RoutingLogSink>) -> Self {
        let Config {
            log_path,
            default_mode,
            providers,
            baseline_model,
            classifier,
            catalog,
            routing,
        } = config;

        tracing::debug!(
            mode = %default_mode,
            providers = %providers,
            sink = sink.name(),
            "Routing engine initialised"
        );

        Self {
            classifier,
            router: Router::new(Arc::new(catalog), Arc::new(routing)),
            mode: ModeCell::new(default_mode),
            providers: RwLock::new(providers),
            baseline_model,
            sink,
            reader: RoutingLogReader::new(log_path),
        }
    }

    /// Build an engine with a background JSONL writer at `config.log_path`.
    /// Must be called inside a tokio runtime.
    pub fn with_file_log(config: Config) -> Self {
        let writer = RoutingLogWriter::spawn(config.log_path.clone());
        Self::new(config, Arc::new(writer))
    }

    pub fn catalog(&self) -> &ModelCatalog {
        self.router.catalog()
    }

    /// Catalog entries of a (mode, tier) preference list, in order.
    pub fn preferences(&self, mode: RoutingMode, tier: Tier) -> Vec<&ModelSpec> {
        self.router.preferences(mode, tier)
    }

    pub fn mode(&self) -> RoutingMode {
        self.mode.get()
    }

    /// Switch the routing mode for every subsequent request.
    pub fn set_mode(&self, mode: RoutingMode) -> RoutingMode {
        self.mode.set(mode)
    }

    pub fn providers(&self) -> ProviderSet {
        self.providers
            .read()
            .map(|p| p.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Replace the set of available providers, e.g. after a credential
    /// reload.
    pub fn set_providers(&self, providers: ProviderSet) {
        tracing::info!(providers = %providers, "Available providers updated");
        match self.providers.write() {
            Ok(mut guard) => *guard = providers,
            Err(e) => *e.into_inner() = providers,
        }
    }

    /// Classify and route a request. No I/O.
    pub fn decide(
        &self,
        request: &RouteRequest,
    ) -> std::result::Result<RoutedRequest, RoutingError> {
        let context = ClassifyContext {
            system_prompt: request.system_prompt.as_deref(),
            message_count: request.message_count,
        };
        let classification = self.classifier.classify(&request.prompt, &context);
        let providers = self.providers();
        let decision = self.router.route(
            &classification,
            self.mode.get(),
            &request.overrides(),
            &providers,
        )?;

        Ok(RoutedRequest {
            request_id: Uuid::new_v4(),
            prompt_hash: prompt_hash(&request.prompt),
            parent_request_id: request.parent_request_id.clone(),
            classification,
            decision,
        })
    }

    /// Estimate the cost of a finished request and enqueue its log entry.
    /// Never fails: log write problems are reported by the sink.
    pub fn record_completion(
        &self,
        routed: &RoutedRequest,
        input_tokens: u64,
        output_tokens: u64,
        latency: Duration,
    ) -> RoutingLogEntry {
        let decision = &routed.decision;
        let entry = RoutingLogEntry {
            request_id: routed.request_id,
            timestamp: Utc::now(),
            prompt_hash: routed.prompt_hash.clone(),
            score: decision.score,
            tier: decision.tier,
            model: decision.model.id.clone(),
            provider: decision.provider(),
            mode: decision.mode,
            override_kind: decision.override_kind,
            input_tokens,
            output_tokens,
            cost_usd: costs::estimate(&decision.model, input_tokens, output_tokens),
            latency_ms: u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            parent_request_id: routed.parent_request_id.clone(),
            classification_us: u64::try_from(routed.classification.elapsed.as_micros()).ok(),
        };
        self.sink.record(entry.clone());
        entry
    }

    /// Estimated cost of `input_tokens`/`output_tokens` on a catalog model.
    pub fn estimate_cost(
        &self,
        model_id: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> std::result::Result<Decimal, RoutingError> {
        let model = self
            .catalog()
            .get(model_id)
            .ok_or_else(|| RoutingError::UnknownModel(model_id.to_string()))?;
        Ok(costs::estimate(model, input_tokens, output_tokens))
    }

    /// Wait for queued log entries to be written.
    pub async fn flush(&self) {
        self.sink.flush().await;
    }

    /// Aggregate the last `days` days of the log. `baseline` overrides the
    /// configured counterfactual model.
    pub fn stats(&self, days: u32, baseline: Option<&str>) -> Result<AggregateStats> {
        let baseline = self.baseline(baseline)?;
        // A window reaching past the representable range covers the whole log.
        let since = TimeDelta::try_days(i64::from(days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let LogScan { entries, malformed } = self.reader.read_since(since)?;
        let mut stats = compute_stats(&entries, baseline);
        stats.malformed_lines = malformed;
        Ok(stats)
    }

    /// Up to `n` most recent log entries, newest first.
    pub fn recent(&self, n: usize) -> std::result::Result<LogScan, LogError> {
        self.reader.tail(n)
    }

    /// Look up one log entry by request id.
    pub fn entry(
        &self,
        request_id: Uuid,
    ) -> std::result::Result<Option<RoutingLogEntry>, LogError> {
        self.reader.find_by_id(request_id)
    }

    fn baseline(&self, id: Option<&str>) -> std::result::Result<&ModelSpec, ConfigError> {
        let id = id.unwrap_or(&self.baseline_model);
        self.catalog()
            .get(id)
            .ok_or_else(|| ConfigError::UnknownBaseline(id.to_string()))
    }
}
