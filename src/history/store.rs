//! Append-only JSONL routing log.
//!
//! Writes go through a single background task that owns the file, so
//! appends are serialised without locking on the request path. Reads open
//! the file independently and tolerate partially written or malformed
//! lines.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::LogError;
use crate::history::entry::RoutingLogEntry;

/// Destination for completed routing records.
///
/// `record` must never block or fail the caller. Implementations decide
/// what to do with write failures.
#[async_trait]
pub trait RoutingLogSink: Send + Sync {
    /// Enqueue an entry. Fire-and-forget.
    fn record(&self, entry: RoutingLogEntry);

    /// Wait until every entry recorded so far has been handled. No-op by
    /// default.
    async fn flush(&self) {}

    /// Human-readable backend name (e.g. "noop", "jsonl").
    fn name(&self) -> &str;
}

/// Sink that drops every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl RoutingLogSink for NoopSink {
    fn record(&self, _entry: RoutingLogEntry) {}

    fn name(&self) -> &str {
        "noop"
    }
}

enum WriterCommand {
    Append(Box<RoutingLogEntry>),
    Flush(oneshot::Sender<()>),
}

/// Background JSONL appender.
///
/// Dropping the writer closes the channel; the task drains what is queued
/// and exits.
pub struct RoutingLogWriter {
    path: PathBuf,
    tx: mpsc::UnboundedSender<WriterCommand>,
}

impl RoutingLogWriter {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(path.clone(), rx));
        Self { path, tx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RoutingLogSink for RoutingLogWriter {
    fn record(&self, entry: RoutingLogEntry) {
        if self.tx.send(WriterCommand::Append(Box::new(entry))).is_err() {
            tracing::warn!(
                path = %self.path.display(),
                "Routing log writer has stopped, entry dropped"
            );
        }
    }

    async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriterCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriterCommand>) {
    let mut file: Option<tokio::fs::File> = None;
    // Set after a failed append, which may have left a partial line behind.
    let mut torn = false;

    while let Some(command) = rx.recv().await {
        match command {
            WriterCommand::Append(entry) => match append(&path, &mut file, &entry, torn).await {
                Ok(()) => torn = false,
                Err(e) => {
                    tracing::warn!(request_id = %entry.request_id, "{}", e);
                    // Reopen on the next entry in case the file was moved.
                    file = None;
                    torn = true;
                }
            },
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    tracing::debug!(path = %path.display(), "Routing log writer stopped");
}

async fn append(
    path: &Path,
    file: &mut Option<tokio::fs::File>,
    entry: &RoutingLogEntry,
    torn: bool,
) -> Result<(), LogError> {
    let mut line = String::new();
    if torn {
        // Terminate whatever fragment the failed write left.
        line.push('\n');
    }
    line.push_str(&serde_json::to_string(entry)?);
    line.push('\n');

    let write_err = |source| LogError::Write {
        path: path.to_path_buf(),
        source,
    };

    if file.is_none() {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let opened = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(write_err)?;
        *file = Some(opened);
    }

    if let Some(f) = file.as_mut() {
        f.write_all(line.as_bytes()).await.map_err(write_err)?;
        f.flush().await.map_err(write_err)?;
    }
    Ok(())
}

/// Entries read from the log plus the number of lines that failed to parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogScan {
    pub entries: Vec<RoutingLogEntry>,
    pub malformed: usize,
}

/// Read side of the routing log.
#[derive(Debug, Clone)]
pub struct RoutingLogReader {
    path: PathBuf,
}

impl RoutingLogReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every parseable entry, in file order. A missing file reads as empty.
    pub fn read_all(&self) -> Result<LogScan, LogError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LogScan::default()),
            Err(source) => {
                return Err(LogError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut scan = LogScan::default();
        // Byte lines: a torn or non-UTF-8 line is malformed, not a read failure.
        for (idx, line) in std::io::BufReader::new(file).split(b'\n').enumerate() {
            let line = line.map_err(|source| LogError::Read {
                path: self.path.clone(),
                source,
            })?;
            let trimmed = line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_slice::<RoutingLogEntry>(trimmed) {
                Ok(entry) => scan.entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        "Skipping malformed routing log line: {}",
                        e
                    );
                    scan.malformed += 1;
                }
            }
        }
        Ok(scan)
    }

    /// Entries with `timestamp >= since`.
    pub fn read_since(&self, since: DateTime<Utc>) -> Result<LogScan, LogError> {
        let mut scan = self.read_all()?;
        scan.entries.retain(|e| e.timestamp >= since);
        Ok(scan)
    }

    /// The most recent entry with this id. Later lines win when an id
    /// appears more than once.
    pub fn find_by_id(&self, request_id: Uuid) -> Result<Option<RoutingLogEntry>, LogError> {
        let scan = self.read_all()?;
        Ok(scan
            .entries
            .into_iter()
            .rev()
            .find(|e| e.request_id == request_id))
    }

    /// Up to `n` most recent entries, newest first.
    pub fn tail(&self, n: usize) -> Result<LogScan, LogError> {
        let mut scan = self.read_all()?;
        scan.entries.reverse();
        scan.entries.truncate(n);
        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::Duration;
    use rust_decimal_macros::dec;
    use tiergate_classifier::Tier;

    use super::*;
    use crate::history::entry::prompt_hash;
    use crate::llm::{OverrideKind, Provider, RoutingMode};

    fn entry_at(timestamp: DateTime<Utc>) -> RoutingLogEntry {
        RoutingLogEntry {
            request_id: Uuid::new_v4(),
            timestamp,
            prompt_hash: prompt_hash("test"),
            score: 0.3,
            tier: Tier::Standard,
            model: "deepseek-chat".to_string(),
            provider: Provider::DeepSeek,
            mode: RoutingMode::Eco,
            override_kind: OverrideKind::None,
            input_tokens: 1000,
            output_tokens: 500,
            cost_usd: dec!(0.00082),
            latency_ms: 120,
            parent_request_id: None,
            classification_us: None,
        }
    }

    #[tokio::test]
    async fn writer_creates_parent_dirs_and_appends_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deeper/routing.jsonl");
        let writer = RoutingLogWriter::spawn(&path);

        let first = entry_at(Utc::now());
        let second = entry_at(Utc::now());
        writer.record(first.clone());
        writer.record(second.clone());
        writer.flush().await;

        let raw = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(raw.lines().count(), 2);

        let scan = RoutingLogReader::new(&path).read_all().unwrap();
        assert_eq!(scan.entries, vec![first, second]);
        assert_eq!(scan.malformed, 0);
    }

    #[tokio::test]
    async fn writer_failure_does_not_reach_caller() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory where the file should be makes every open fail.
        let path = dir.path().join("routing.jsonl");
        std::fs::create_dir_all(&path).unwrap();

        let writer = RoutingLogWriter::spawn(&path);
        writer.record(entry_at(Utc::now()));
        writer.flush().await;
        assert!(path.is_dir());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reader = RoutingLogReader::new(dir.path().join("absent.jsonl"));
        assert_eq!(reader.read_all().unwrap(), LogScan::default());
        assert!(reader.find_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn malformed_lines_are_skipped_and_counted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routing.jsonl");
        let good = entry_at(Utc::now());

        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", serde_json::to_string(&good).unwrap()).unwrap();
        writeln!(f, "{{\"request_id\": \"trunc").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "not json at all").unwrap();
        drop(f);

        let scan = RoutingLogReader::new(&path).read_all().unwrap();
        assert_eq!(scan.entries, vec![good]);
        assert_eq!(scan.malformed, 2);
    }

    #[test]
    fn non_utf8_line_is_skipped_and_counted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routing.jsonl");
        let before = entry_at(Utc::now());
        let after = entry_at(Utc::now());

        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{}", serde_json::to_string(&before).unwrap()).unwrap();
        f.write_all(b"{\"request_id\": \"\xff\xfe garbage\n").unwrap();
        writeln!(f, "{}", serde_json::to_string(&after).unwrap()).unwrap();
        drop(f);

        let reader = RoutingLogReader::new(&path);
        let scan = reader.read_all().unwrap();
        assert_eq!(scan.entries, vec![before, after.clone()]);
        assert_eq!(scan.malformed, 1);
        assert_eq!(reader.tail(1).unwrap().entries, vec![after]);
    }

    #[tokio::test]
    async fn append_after_failure_starts_a_fresh_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routing.jsonl");
        std::fs::write(&path, b"{\"request_id\": \"half-writ").unwrap();

        let entry = entry_at(Utc::now());
        let mut file = None;
        append(&path, &mut file, &entry, true).await.unwrap();

        let scan = RoutingLogReader::new(&path).read_all().unwrap();
        assert_eq!(scan.entries, vec![entry]);
        assert_eq!(scan.malformed, 1);
    }

    #[test]
    fn read_since_filters_by_timestamp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routing.jsonl");
        let now = Utc::now();
        let old = entry_at(now - Duration::days(10));
        let recent = entry_at(now - Duration::hours(1));

        let mut f = std::fs::File::create(&path).unwrap();
        for e in [&old, &recent] {
            writeln!(f, "{}", serde_json::to_string(e).unwrap()).unwrap();
        }
        drop(f);

        let scan = RoutingLogReader::new(&path)
            .read_since(now - Duration::days(7))
            .unwrap();
        assert_eq!(scan.entries, vec![recent]);
    }

    #[test]
    fn tail_and_find_return_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routing.jsonl");
        let now = Utc::now();
        let entries: Vec<_> = (0..5)
            .map(|i| entry_at(now + Duration::seconds(i)))
            .collect();

        let mut duplicate = entries[1].clone();
        duplicate.latency_ms = 9999;

        let mut f = std::fs::File::create(&path).unwrap();
        for e in entries.iter().chain(std::iter::once(&duplicate)) {
            writeln!(f, "{}", serde_json::to_string(e).unwrap()).unwrap();
        }
        drop(f);

        let reader = RoutingLogReader::new(&path);
        let tail = reader.tail(2).unwrap();
        assert_eq!(tail.entries.len(), 2);
        assert_eq!(tail.entries[0], duplicate);
        assert_eq!(tail.entries[1], entries[4]);

        let found = reader.find_by_id(entries[1].request_id).unwrap().unwrap();
        assert_eq!(found.latency_ms, 9999);
    }
}
