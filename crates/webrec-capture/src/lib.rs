//! Capture streams for webrec recording sessions.
//!
//! A session runs three host-side streams, each a task bound to the
//! session's [`CaptureScope`](webrec_common_async::CaptureScope):
//!
//! - [`NetworkCapture`]: completed requests for the window, to `network.ndjson`
//! - [`InputCapture`]: host-level key presses, to `events.ndjson`
//! - [`FrameCapture`]: periodic page snapshots, to `frames/NNNNN.png`
//!
//! [`EventCapture`] is the piece that lives in the page itself; it forwards
//! DOM-level records back to the host.
//!
//! All persistence goes through bounded sinks ([`EventLogWriter`],
//! [`FrameWriter`]) drained by one writer task each. Write faults are logged
//! and discarded.

mod batch;
mod flags;
mod frame;
mod frames;
mod input;
mod network;
mod remote;
pub mod source;
mod throttle;
mod writer;

pub use batch::BatchConfig;
pub use flags::SessionFlags;
pub use frame::{FrameCapture, MotionListener};
pub use frames::FrameWriter;
pub use input::InputCapture;
pub use network::NetworkCapture;
pub use remote::{DomSignal, EventCapture, NavigationRequest, RecordForwarder};
pub use source::{HostError, MotionSignal, WindowHost};
pub use throttle::Throttle;
pub use writer::{EventLogWriter, SinkConfig, SinkHandle, SinkStats};

use std::path::PathBuf;
use std::time::Duration;
use webrec_common_config::RecordingConfig;

/// Capture errors.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error(transparent)]
    Io(#[from] webrec_common_core::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink for {} is closed", .0.display())]
    SinkClosed(PathBuf),
}

/// Settings for the capture streams of one session.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Frame timer period.
    pub frame_period: Duration,
    /// Scroll coalescing window in the page.
    pub scroll_throttle: Duration,
    /// Text-input coalescing window in the page.
    pub input_throttle: Duration,
    /// Characters kept from text payloads.
    pub max_text_len: usize,
    /// Sink settings shared by every writer.
    pub sink: SinkConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::from(&RecordingConfig::default())
    }
}

impl From<&RecordingConfig> for CaptureConfig {
    fn from(config: &RecordingConfig) -> Self {
        Self {
            frame_period: config.frame_period(),
            scroll_throttle: config.scroll_throttle(),
            input_throttle: config.input_throttle(),
            max_text_len: config.max_text_len,
            sink: SinkConfig {
                queue_capacity: config.sink_queue_capacity,
                batch: BatchConfig {
                    max_batch_size: config.flush_batch_size,
                    max_batch_age: config.flush_interval(),
                },
            },
        }
    }
}

/// Current host time in milliseconds, the `ts` of every record.
pub fn receipt_time() -> i64 {
    webrec_common_core::Timestamp::now().as_millis()
}
