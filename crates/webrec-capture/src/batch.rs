//! Line batching for log sinks.

use crate::writer::SinkStats;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Configuration for batch collection.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum lines per write.
    pub max_batch_size: usize,
    /// Maximum time a line may wait before it is written.
    pub max_batch_age: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 64,
            max_batch_age: Duration::from_millis(250),
        }
    }
}

/// Lines waiting to be written together.
#[derive(Debug, Default)]
pub(crate) struct LineBatch {
    lines: Vec<String>,
    started_at: Option<Instant>,
}

impl LineBatch {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Batch collector that aggregates lines.
pub(crate) struct BatchCollector {
    config: BatchConfig,
    current_batch: LineBatch,
}

impl BatchCollector {
    pub(crate) fn new(config: BatchConfig) -> Self {
        Self {
            config,
            current_batch: LineBatch::default(),
        }
    }

    /// Add a line; returns the batch if it is full.
    pub(crate) fn add(&mut self, line: String) -> Option<LineBatch> {
        if self.current_batch.is_empty() {
            self.current_batch.started_at = Some(Instant::now());
        }
        self.current_batch.lines.push(line);

        if self.current_batch.len() >= self.config.max_batch_size {
            Some(self.take_batch())
        } else {
            None
        }
    }

    /// Whether the oldest pending line has waited long enough.
    pub(crate) fn is_due(&self) -> bool {
        self.current_batch
            .started_at
            .is_some_and(|t| t.elapsed() >= self.config.max_batch_age)
    }

    pub(crate) fn take_batch(&mut self) -> LineBatch {
        std::mem::take(&mut self.current_batch)
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.current_batch.is_empty()
    }
}

/// Drain `receiver` into `file` until every sender is gone.
pub(crate) async fn batch_processing_loop(
    mut receiver: mpsc::Receiver<String>,
    mut file: File,
    path: &Path,
    config: BatchConfig,
) -> SinkStats {
    let mut stats = SinkStats::default();
    let mut collector = BatchCollector::new(config.clone());
    let tick = (config.max_batch_age / 2).max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(tick);

    loop {
        tokio::select! {
            line = receiver.recv() => match line {
                Some(line) => {
                    if let Some(batch) = collector.add(line) {
                        debug!("Flushing batch of {} lines (size limit)", batch.len());
                        write_batch(&mut file, batch, path, &mut stats).await;
                    }
                }
                None => break,
            },
            _ = interval.tick() => {
                if collector.is_due() {
                    let batch = collector.take_batch();
                    debug!("Flushing batch of {} lines (time limit)", batch.len());
                    write_batch(&mut file, batch, path, &mut stats).await;
                }
            }
        }
    }

    if collector.has_pending() {
        let batch = collector.take_batch();
        write_batch(&mut file, batch, path, &mut stats).await;
    }
    stats
}

async fn write_batch(file: &mut File, batch: LineBatch, path: &Path, stats: &mut SinkStats) {
    let count = batch.len() as u64;
    let mut buf = String::with_capacity(batch.lines.iter().map(|l| l.len() + 1).sum());
    for line in &batch.lines {
        buf.push_str(line);
        buf.push('\n');
    }

    let result = async {
        file.write_all(buf.as_bytes()).await?;
        file.flush().await
    }
    .await;

    match result {
        Ok(()) => stats.written += count,
        Err(e) => {
            warn!(path = %path.display(), lines = count, "discarding log lines: {}", e);
            stats.failed += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: usize, age_ms: u64) -> BatchConfig {
        BatchConfig {
            max_batch_size: size,
            max_batch_age: Duration::from_millis(age_ms),
        }
    }

    #[test]
    fn test_flushes_at_size_limit() {
        let mut collector = BatchCollector::new(config(2, 1_000));
        assert!(collector.add("a".into()).is_none());
        let batch = collector.add("b".into()).expect("full batch");
        assert_eq!(batch.lines, vec!["a", "b"]);
        assert!(!collector.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_due_after_age() {
        let mut collector = BatchCollector::new(config(100, 250));
        assert!(!collector.is_due());
        collector.add("a".into());
        assert!(!collector.is_due());
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!(collector.is_due());
    }
}
