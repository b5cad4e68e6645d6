//! Host-level keyboard capture.

use crate::flags::SessionFlags;
use crate::writer::EventLogWriter;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use webrec_common_async::{CaptureScope, StreamGuard};
use webrec_record_types::{EventRecord, RawKeyInput};

/// Records key presses seen by the host for one window.
///
/// Observing keys before they reach the page keeps them independent of the
/// page's own lifecycle.
pub struct InputCapture {
    flags: Arc<SessionFlags>,
    writer: EventLogWriter,
}

impl InputCapture {
    pub fn new(flags: Arc<SessionFlags>, writer: EventLogWriter) -> Self {
        Self { flags, writer }
    }

    /// Run until the returned guard is released.
    pub fn start(
        self,
        scope: &CaptureScope,
        mut inputs: broadcast::Receiver<RawKeyInput>,
    ) -> StreamGuard {
        scope.spawn("input", move |token| async move {
            loop {
                let input = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    input = inputs.recv() => input,
                };
                match input {
                    Ok(input) => self.handle(input).await,
                    Err(RecvError::Lagged(n)) => warn!(skipped = n, "keyboard input lagged"),
                    Err(RecvError::Closed) => {
                        debug!("keyboard input closed");
                        break;
                    }
                }
            }
        })
    }

    async fn handle(&self, input: RawKeyInput) {
        if !self.flags.is_recording() {
            return;
        }
        if let Some(payload) = input.to_payload() {
            let record = EventRecord::stamp(payload, crate::receipt_time());
            self.writer.record(&record).await;
        }
    }
}
