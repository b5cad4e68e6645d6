//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Lowest frame period inside the recommended range.
pub const RECOMMENDED_MIN_FRAME_PERIOD_MS: u64 = 33;
/// Highest frame period inside the recommended range.
pub const RECOMMENDED_MAX_FRAME_PERIOD_MS: u64 = 100;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebrecConfig {
    /// Capture settings.
    pub recording: RecordingConfig,
    /// Video composition settings.
    pub encoder: EncoderConfig,
}

/// Capture settings shared by every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Initial destination root; may be replaced at runtime.
    pub destination_root: Option<PathBuf>,
    /// Frame timer period (ms).
    pub frame_period_ms: u64,
    /// Scroll records are coalesced to one per window (ms).
    pub scroll_throttle_ms: u64,
    /// Text-input records are coalesced to one per window (ms).
    pub input_throttle_ms: u64,
    /// Maximum characters kept from input values and visible text.
    pub max_text_len: usize,
    /// Capacity of each per-session sink queue.
    pub sink_queue_capacity: usize,
    /// Log lines written per flush.
    pub flush_batch_size: usize,
    /// Maximum age of buffered log lines before a flush (ms).
    pub flush_interval_ms: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            destination_root: None,
            frame_period_ms: 33,
            scroll_throttle_ms: 200,
            input_throttle_ms: 30,
            max_text_len: 100,
            sink_queue_capacity: 256,
            flush_batch_size: 64,
            flush_interval_ms: 250,
        }
    }
}

impl RecordingConfig {
    /// Frame timer period.
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    /// Scroll throttle window.
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// Text-input throttle window.
    pub fn input_throttle(&self) -> Duration {
        Duration::from_millis(self.input_throttle_ms)
    }

    /// Log flush interval.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Whether the frame period sits in the recommended 33-100 ms range.
    pub fn frame_period_is_recommended(&self) -> bool {
        (RECOMMENDED_MIN_FRAME_PERIOD_MS..=RECOMMENDED_MAX_FRAME_PERIOD_MS)
            .contains(&self.frame_period_ms)
    }
}

/// External encoder invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Encoder executable, resolved through `PATH` when not absolute.
    pub program: String,
    /// Nominal input frame rate.
    pub framerate: u32,
    /// Video codec.
    pub codec: String,
    /// Output pixel format.
    pub pixel_format: String,
    /// Encoder speed preset.
    pub preset: String,
    /// File name of the video inside the run directory.
    pub output_file: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            framerate: 30,
            codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            preset: "fast".to_string(),
            output_file: "recording.mp4".to_string(),
        }
    }
}
