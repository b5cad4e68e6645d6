use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use webrec_capture::{HostError, MotionSignal, SessionFlags, WindowHost};
use webrec_common_core::WindowId;
use webrec_record_types::{NetworkCompletion, RawKeyInput};

/// Single-window host whose streams are driven by the test.
pub struct StubHost {
    pub id: WindowId,
    pub network: broadcast::Sender<NetworkCompletion>,
    pub input: broadcast::Sender<RawKeyInput>,
    pub motion: broadcast::Sender<MotionSignal>,
    pub fail_captures: AtomicBool,
    pub captures: AtomicUsize,
    /// Cleared to not-recording while the next snapshot is in flight.
    pub stop_during_capture: Mutex<Option<Arc<SessionFlags>>>,
}

impl StubHost {
    pub fn new(id: u32) -> Self {
        Self {
            id: WindowId::new(id),
            network: broadcast::channel(64).0,
            input: broadcast::channel(64).0,
            motion: broadcast::channel(8).0,
            fail_captures: AtomicBool::new(false),
            captures: AtomicUsize::new(0),
            stop_during_capture: Mutex::new(None),
        }
    }
}

#[async_trait]
impl WindowHost for StubHost {
    fn is_alive(&self, id: WindowId) -> bool {
        id == self.id
    }

    fn live_windows(&self) -> Vec<WindowId> {
        vec![self.id]
    }

    fn current_url(&self, _id: WindowId) -> Option<String> {
        Some("https://example.com/".into())
    }

    fn open_window(&self, url: &str) -> Result<WindowId, HostError> {
        Err(HostError::Open(url.to_string()))
    }

    async fn capture_page(&self, id: WindowId) -> Result<Vec<u8>, HostError> {
        let n = self.captures.fetch_add(1, Ordering::SeqCst);
        if let Some(flags) = self.stop_during_capture.lock().unwrap().take() {
            flags.set_recording(false);
        }
        if self.fail_captures.load(Ordering::SeqCst) {
            return Err(HostError::Capture("offscreen".into()));
        }
        Ok(format!("frame-{id}-{n}").into_bytes())
    }

    fn send_recording_toggle(&self, _id: WindowId, _active: bool) {}

    fn subscribe_network(&self) -> broadcast::Receiver<NetworkCompletion> {
        self.network.subscribe()
    }

    fn subscribe_input(&self, id: WindowId) -> Result<broadcast::Receiver<RawKeyInput>, HostError> {
        if id != self.id {
            return Err(HostError::WindowGone(id));
        }
        Ok(self.input.subscribe())
    }

    fn subscribe_motion(&self, id: WindowId) -> Result<broadcast::Receiver<MotionSignal>, HostError> {
        if id != self.id {
            return Err(HostError::WindowGone(id));
        }
        Ok(self.motion.subscribe())
    }
}
