//! Leading-edge throttling.

use std::time::Duration;
use tokio::time::Instant;

/// Admits at most one event per window; the first event opens the window.
///
/// Events inside an open window are rejected and never replayed.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether an event at `now` should be recorded.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the open window.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
