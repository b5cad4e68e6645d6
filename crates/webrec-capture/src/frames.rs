//! Frame image sink.

use crate::writer::{SinkHandle, SinkStats};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, trace, warn};
use webrec_record_types::frame_file_name;

#[derive(Debug)]
struct FrameJob {
    index: u64,
    bytes: Vec<u8>,
}

/// Producer side of a session's frames directory.
///
/// Frames are written one at a time, in submission order, by a single
/// writer task. Submission never waits: when the queue is full the frame is
/// dropped and its index stays a gap.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    sender: mpsc::Sender<FrameJob>,
}

impl FrameWriter {
    /// Start a writer task for `dir`, which must already exist.
    pub fn start(dir: impl Into<PathBuf>, queue_capacity: usize) -> (Self, SinkHandle) {
        let dir = dir.into();
        let (sender, mut receiver) = mpsc::channel::<FrameJob>(queue_capacity.max(1));

        let handle = tokio::spawn(async move {
            let mut stats = SinkStats::default();
            while let Some(job) = receiver.recv().await {
                let path = dir.join(frame_file_name(job.index));
                let write_path = path.clone();
                let result = tokio::task::spawn_blocking(move || {
                    webrec_common_fs::write_atomic(&write_path, &job.bytes)
                })
                .await;

                match result {
                    Ok(Ok(())) => {
                        trace!(path = %path.display(), "frame written");
                        stats.written += 1;
                    }
                    Ok(Err(e)) => {
                        warn!("discarding frame: {}", e);
                        stats.failed += 1;
                    }
                    Err(e) => {
                        error!(path = %path.display(), "frame write task failed: {}", e);
                        stats.failed += 1;
                    }
                }
            }
            debug!(
                dir = %dir.display(),
                written = stats.written,
                failed = stats.failed,
                "frame sink closed"
            );
            stats
        });

        (Self { sender }, handle)
    }

    /// Queue frame `index`. Returns false if it was dropped.
    pub fn submit(&self, index: u64, bytes: Vec<u8>) -> bool {
        match self.sender.try_send(FrameJob { index, bytes }) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(index, "frame queue full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(index, "frame sink closed");
                false
            }
        }
    }
}
