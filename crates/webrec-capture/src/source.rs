//! The window host seen from the recorder.
//!
//! Window presentation, the page runtime and the IPC transport live outside
//! this workspace. [`WindowHost`] is the contract they expose.

use async_trait::async_trait;
use tokio::sync::broadcast;
use webrec_common_core::WindowId;
use webrec_record_types::{NetworkCompletion, RawKeyInput};

/// Errors reported by the window host.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("window {0} does not exist or is closed")]
    WindowGone(WindowId),

    #[error("page capture failed: {0}")]
    Capture(String),

    #[error("failed to open window: {0}")]
    Open(String),
}

/// Window movement notifications. Resizes are reported the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSignal {
    MoveStarted,
    MoveEnded,
}

/// Host operations the recorder depends on.
#[async_trait]
pub trait WindowHost: Send + Sync + 'static {
    /// Whether the window exists and has not been destroyed.
    fn is_alive(&self, id: WindowId) -> bool;

    /// Every live monitored window.
    fn live_windows(&self) -> Vec<WindowId>;

    /// URL currently loaded in the window.
    fn current_url(&self, id: WindowId) -> Option<String>;

    /// Open a new monitored window on an already validated URL.
    fn open_window(&self, url: &str) -> Result<WindowId, HostError>;

    /// Snapshot the window's page as PNG bytes.
    async fn capture_page(&self, id: WindowId) -> Result<Vec<u8>, HostError>;

    /// Deliver `{active}` to the page's capture context.
    fn send_recording_toggle(&self, id: WindowId, active: bool);

    /// Completed requests of the shared network context, for every window.
    fn subscribe_network(&self) -> broadcast::Receiver<NetworkCompletion>;

    /// Raw keyboard input for one window.
    fn subscribe_input(
        &self,
        id: WindowId,
    ) -> Result<broadcast::Receiver<RawKeyInput>, HostError>;

    /// Move and resize notifications for one window.
    fn subscribe_motion(
        &self,
        id: WindowId,
    ) -> Result<broadcast::Receiver<MotionSignal>, HostError>;
}
