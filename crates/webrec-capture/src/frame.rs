//! Periodic frame capture.

use crate::flags::SessionFlags;
use crate::frames::FrameWriter;
use crate::source::{MotionSignal, WindowHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};
use webrec_common_async::{CaptureScope, StreamGuard};
use webrec_common_core::WindowId;

/// Snapshots a window on a fixed period.
///
/// A tick is skipped when the session is not recording or the window is
/// moving, and a snapshot that completes after recording stopped is
/// dropped. Every other tick takes the next index before the snapshot, so a
/// failed snapshot or write leaves a gap instead of shifting later frames.
pub struct FrameCapture {
    window_id: WindowId,
    host: Arc<dyn WindowHost>,
    flags: Arc<SessionFlags>,
    writer: FrameWriter,
    period: Duration,
}

impl FrameCapture {
    pub fn new(
        window_id: WindowId,
        host: Arc<dyn WindowHost>,
        flags: Arc<SessionFlags>,
        writer: FrameWriter,
        period: Duration,
    ) -> Self {
        Self {
            window_id,
            host,
            flags,
            writer,
            period,
        }
    }

    /// Start the frame timer. Releasing the guard stops it.
    pub fn start(self, scope: &CaptureScope) -> StreamGuard {
        scope.spawn("frames", move |token| async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut next_index: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                if !self.flags.is_recording() || self.flags.is_moving() {
                    trace!("frame tick skipped");
                    continue;
                }

                let index = next_index;
                next_index += 1;

                let snapshot = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    snapshot = self.host.capture_page(self.window_id) => snapshot,
                };
                match snapshot {
                    Ok(_) if !self.flags.is_recording() => {
                        trace!(index, "frame dropped: recording stopped during capture");
                    }
                    Ok(bytes) => {
                        self.writer.submit(index, bytes);
                    }
                    Err(e) => warn!(index, "frame capture failed: {}", e),
                }
            }
            debug!(frames = next_index, "frame timer stopped");
        })
    }
}

/// Tracks move and resize notifications for the frame timer.
pub struct MotionListener {
    flags: Arc<SessionFlags>,
}

impl MotionListener {
    pub fn new(flags: Arc<SessionFlags>) -> Self {
        Self { flags }
    }

    /// Run until the returned guard is released.
    pub fn start(
        self,
        scope: &CaptureScope,
        mut signals: broadcast::Receiver<MotionSignal>,
    ) -> StreamGuard {
        scope.spawn("motion", move |token| async move {
            loop {
                let signal = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    signal = signals.recv() => signal,
                };
                match signal {
                    Ok(MotionSignal::MoveStarted) => self.flags.set_moving(true),
                    Ok(MotionSignal::MoveEnded) => self.flags.set_moving(false),
                    Err(RecvError::Lagged(n)) => warn!(skipped = n, "motion signals lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
