//! Network completion capture.

use crate::flags::SessionFlags;
use crate::writer::EventLogWriter;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, trace, warn};
use webrec_common_async::{CaptureScope, StreamGuard};
use webrec_common_core::WindowId;
use webrec_record_types::{NetworkCompletion, NetworkRecord};

/// Filters the shared network stream down to one window.
pub struct NetworkCapture {
    window_id: WindowId,
    flags: Arc<SessionFlags>,
    writer: EventLogWriter,
}

impl NetworkCapture {
    pub fn new(window_id: WindowId, flags: Arc<SessionFlags>, writer: EventLogWriter) -> Self {
        Self {
            window_id,
            flags,
            writer,
        }
    }

    /// Run until the returned guard is released.
    pub fn start(
        self,
        scope: &CaptureScope,
        mut completions: broadcast::Receiver<NetworkCompletion>,
    ) -> StreamGuard {
        scope.spawn("network", move |token| async move {
            loop {
                let completion = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    completion = completions.recv() => completion,
                };
                match completion {
                    Ok(completion) => self.handle(completion).await,
                    Err(RecvError::Lagged(n)) => warn!(skipped = n, "network stream lagged"),
                    Err(RecvError::Closed) => {
                        debug!("network stream closed");
                        break;
                    }
                }
            }
        })
    }

    async fn handle(&self, completion: NetworkCompletion) {
        if completion.window_id != self.window_id {
            return;
        }
        // A completion landing after stop is dropped.
        if !self.flags.is_recording() {
            trace!(url = %completion.url, "network completion after stop dropped");
            return;
        }
        let record = NetworkRecord::from_completion(completion, crate::receipt_time());
        self.writer.record(&record).await;
    }
}
