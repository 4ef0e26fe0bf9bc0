//! Routing history: the append-only JSONL log and statistics derived from
//! it.

mod entry;
mod stats;
mod store;

pub use entry::{RoutingLogEntry, prompt_hash};
pub use stats::{AggregateStats, ModelUsage, TierUsage, compute_stats};
pub use store::{LogScan, NoopSink, RoutingLogReader, RoutingLogSink, RoutingLogWriter};
