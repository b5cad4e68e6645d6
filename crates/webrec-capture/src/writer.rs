//! Append-only NDJSON log sink.

use crate::batch::{batch_processing_loop, BatchConfig};
use crate::CaptureError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Settings shared by every sink of a session.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Bounded queue length per sink.
    pub queue_capacity: usize,
    /// Log line batching.
    pub batch: BatchConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            batch: BatchConfig::default(),
        }
    }
}

/// What a sink task did before it exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub written: u64,
    pub failed: u64,
}

/// Handle to a sink's writer task; resolves once the queue is drained.
pub type SinkHandle = JoinHandle<SinkStats>;

/// Producer side of one log file.
///
/// Cloning is cheap. The writer task exits after the last clone is dropped
/// and every queued line has been written.
#[derive(Debug, Clone)]
pub struct EventLogWriter {
    sender: mpsc::Sender<String>,
    path: Arc<PathBuf>,
}

impl EventLogWriter {
    /// Open `path` for appending and start its writer task.
    ///
    /// Existing content is kept; the file is never truncated.
    pub fn open(
        path: impl Into<PathBuf>,
        config: &SinkConfig,
    ) -> Result<(Self, SinkHandle), CaptureError> {
        let path = path.into();
        let file = webrec_common_fs::open_append(&path)?;
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));

        let task_path = path.clone();
        let batch = config.batch.clone();
        let handle = tokio::spawn(async move {
            let file = tokio::fs::File::from_std(file);
            let stats = batch_processing_loop(receiver, file, &task_path, batch).await;
            debug!(
                path = %task_path.display(),
                written = stats.written,
                failed = stats.failed,
                "log sink closed"
            );
            stats
        });

        Ok((
            Self {
                sender,
                path: Arc::new(path),
            },
            handle,
        ))
    }

    /// Log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue one line, waiting for room if the queue is full.
    pub async fn append(&self, line: String) -> Result<(), CaptureError> {
        self.sender
            .send(line)
            .await
            .map_err(|_| CaptureError::SinkClosed(self.path.to_path_buf()))
    }

    /// Serialize `record` and queue it as one line.
    pub async fn append_json<T: Serialize>(&self, record: &T) -> Result<(), CaptureError> {
        let line = serde_json::to_string(record)?;
        self.append(line).await
    }

    /// Like [`append_json`](Self::append_json) but logs failures instead of returning them.
    pub async fn record<T: Serialize>(&self, record: &T) {
        if let Err(e) = self.append_json(record).await {
            warn!(path = %self.path.display(), "discarding record: {}", e);
        }
    }
}
