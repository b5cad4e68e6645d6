//! Tracing spans used across the recorder.

use std::path::Path;
use tracing::{info_span, Span};

/// Span covering everything done on behalf of one monitored window.
pub fn session_span(window_id: impl std::fmt::Display) -> Span {
    info_span!("session", window = %window_id)
}

/// Span covering one video composition job.
pub fn compose_span(run_dir: &Path) -> Span {
    info_span!("compose", run_dir = %run_dir.display())
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Complete the timer, log and return the elapsed time.
    pub fn finish(self) -> std::time::Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}
