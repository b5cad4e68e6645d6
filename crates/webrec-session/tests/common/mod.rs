#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use webrec_capture::{HostError, MotionSignal, WindowHost};
use webrec_common_config::WebrecConfig;
use webrec_common_core::WindowId;
use webrec_record_types::{NetworkCompletion, RawKeyInput};

/// Encoder path that never exists, so compositions with frames fail fast.
pub const MISSING_ENCODER: &str = "/nonexistent/webrec-test-encoder";

struct FakeWindow {
    url: String,
    input: broadcast::Sender<RawKeyInput>,
    motion: broadcast::Sender<MotionSignal>,
}

/// What the host saw when a recording toggle reached a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSnapshot {
    pub window_id: WindowId,
    pub active: bool,
    /// Page captures taken before the toggle.
    pub captures: usize,
    pub network_subscribers: usize,
    pub input_subscribers: usize,
    pub motion_subscribers: usize,
}

/// In-memory window host.
pub struct FakeHost {
    windows: Mutex<HashMap<WindowId, FakeWindow>>,
    next_id: AtomicU32,
    network: broadcast::Sender<NetworkCompletion>,
    toggles: Mutex<Vec<ToggleSnapshot>>,
    captures: AtomicUsize,
    pub fail_captures: AtomicBool,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            windows: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(100),
            network: broadcast::channel(256).0,
            toggles: Mutex::new(Vec::new()),
            captures: AtomicUsize::new(0),
            fail_captures: AtomicBool::new(false),
        })
    }

    pub fn add_window(&self, id: u32, url: &str) -> WindowId {
        let id = WindowId::new(id);
        self.windows.lock().unwrap().insert(
            id,
            FakeWindow {
                url: url.to_string(),
                input: broadcast::channel(64).0,
                motion: broadcast::channel(16).0,
            },
        );
        id
    }

    pub fn close(&self, id: WindowId) {
        self.windows.lock().unwrap().remove(&id);
    }

    pub fn key(&self, id: WindowId, input: RawKeyInput) {
        let windows = self.windows.lock().unwrap();
        let _ = windows[&id].input.send(input);
    }

    pub fn motion(&self, id: WindowId, signal: MotionSignal) {
        let windows = self.windows.lock().unwrap();
        let _ = windows[&id].motion.send(signal);
    }

    pub fn complete_request(&self, id: WindowId, url: &str) {
        let _ = self.network.send(NetworkCompletion {
            window_id: id,
            method: "GET".into(),
            url: url.into(),
            status_code: 200,
            from_cache: false,
        });
    }

    pub fn toggles(&self) -> Vec<(WindowId, bool)> {
        self.toggles
            .lock()
            .unwrap()
            .iter()
            .map(|t| (t.window_id, t.active))
            .collect()
    }

    pub fn toggle_snapshots(&self) -> Vec<ToggleSnapshot> {
        self.toggles.lock().unwrap().clone()
    }

    /// Page captures attempted so far, across every window.
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn network_subscribers(&self) -> usize {
        self.network.receiver_count()
    }
}

#[async_trait]
impl WindowHost for FakeHost {
    fn is_alive(&self, id: WindowId) -> bool {
        self.windows.lock().unwrap().contains_key(&id)
    }

    fn live_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.windows.lock().unwrap().keys().copied().collect();
        ids.sort();
        ids
    }

    fn current_url(&self, id: WindowId) -> Option<String> {
        self.windows.lock().unwrap().get(&id).map(|w| w.url.clone())
    }

    fn open_window(&self, url: &str) -> Result<WindowId, HostError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(self.add_window(id, url))
    }

    async fn capture_page(&self, id: WindowId) -> Result<Vec<u8>, HostError> {
        if !self.is_alive(id) {
            return Err(HostError::WindowGone(id));
        }
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_captures.load(Ordering::SeqCst) {
            return Err(HostError::Capture("window hidden".into()));
        }
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }

    fn send_recording_toggle(&self, id: WindowId, active: bool) {
        let (input_subscribers, motion_subscribers) = self
            .windows
            .lock()
            .unwrap()
            .get(&id)
            .map_or((0, 0), |w| (w.input.receiver_count(), w.motion.receiver_count()));
        self.toggles.lock().unwrap().push(ToggleSnapshot {
            window_id: id,
            active,
            captures: self.captures(),
            network_subscribers: self.network.receiver_count(),
            input_subscribers,
            motion_subscribers,
        });
    }

    fn subscribe_network(&self) -> broadcast::Receiver<NetworkCompletion> {
        self.network.subscribe()
    }

    fn subscribe_input(&self, id: WindowId) -> Result<broadcast::Receiver<RawKeyInput>, HostError> {
        self.windows
            .lock()
            .unwrap()
            .get(&id)
            .map(|w| w.input.subscribe())
            .ok_or(HostError::WindowGone(id))
    }

    fn subscribe_motion(&self, id: WindowId) -> Result<broadcast::Receiver<MotionSignal>, HostError> {
        self.windows
            .lock()
            .unwrap()
            .get(&id)
            .map(|w| w.motion.subscribe())
            .ok_or(HostError::WindowGone(id))
    }
}

/// Configuration rooted at `root` with the given frame period.
pub fn config(root: Option<&Path>, frame_period_ms: u64) -> WebrecConfig {
    let mut config = WebrecConfig::default();
    config.recording.destination_root = root.map(Path::to_path_buf);
    config.recording.frame_period_ms = frame_period_ms;
    config.encoder.program = MISSING_ENCODER.to_string();
    config
}

/// Directories directly under `root`.
pub fn run_dirs(root: &Path) -> Vec<std::path::PathBuf> {
    let mut dirs: Vec<_> = std::fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
