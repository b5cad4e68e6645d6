//! Capture running inside the monitored page.
//!
//! The page side sees DOM events, applies throttling and truncation, and
//! forwards `{type, ...fields}` payloads to the host. It never stamps time
//! and never records keyboard input; the host does both.

use crate::throttle::Throttle;
use crate::CaptureConfig;
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::trace;
use webrec_record_types::{kinds, truncate_text, RemotePayload};

/// Transport from the page back to the host.
#[async_trait]
pub trait RecordForwarder: Send + Sync {
    async fn forward(&self, payload: RemotePayload);
}

#[async_trait]
impl RecordForwarder for tokio::sync::mpsc::UnboundedSender<RemotePayload> {
    async fn forward(&self, payload: RemotePayload) {
        let _ = self.send(payload);
    }
}

/// A DOM-level signal observed in the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DomSignal {
    Click {
        x: i64,
        y: i64,
        tag: String,
        id: String,
        class_name: String,
        text: String,
    },
    Scroll {
        x: i64,
        y: i64,
    },
    Input {
        tag: String,
        id: String,
        value: String,
    },
    RuntimeError {
        message: String,
        filename: String,
        lineno: u32,
        colno: u32,
    },
}

/// A navigation the page is about to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Anchor click.
    Anchor(String),
    /// `window.open` or `target=_blank`.
    NewWindow(String),
}

impl NavigationRequest {
    fn url(&self) -> &str {
        match self {
            Self::Anchor(url) | Self::NewWindow(url) => url,
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Anchor(_) => "anchor",
            Self::NewWindow(_) => "new-window",
        }
    }
}

/// Page-side recorder for one window.
pub struct EventCapture<F> {
    forwarder: F,
    active: bool,
    scroll: Throttle,
    input: Throttle,
    max_text_len: usize,
}

impl<F: RecordForwarder> EventCapture<F> {
    pub fn new(forwarder: F, config: &CaptureConfig) -> Self {
        Self {
            forwarder,
            active: false,
            scroll: Throttle::new(config.scroll_throttle),
            input: Throttle::new(config.input_throttle),
            max_text_len: config.max_text_len,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply a `recording-toggle` message from the host.
    ///
    /// Transitions emit `recording-start` / `recording-stop`; repeating the
    /// current state does nothing.
    pub async fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.scroll.reset();
        self.input.reset();
        let marker = if active {
            kinds::RECORDING_START
        } else {
            kinds::RECORDING_STOP
        };
        self.forwarder.forward(RemotePayload::new(marker)).await;
    }

    /// Observe a DOM signal at `now`. Returns whether a record was forwarded.
    pub async fn observe(&mut self, signal: DomSignal, now: Instant) -> bool {
        if !self.active {
            return false;
        }

        let payload = match signal {
            DomSignal::Click {
                x,
                y,
                tag,
                id,
                class_name,
                text,
            } => RemotePayload::new(kinds::CLICK)
                .with("x", x)
                .with("y", y)
                .with("tag", tag)
                .with("id", id)
                .with("className", class_name)
                .with("text", truncate_text(&text, self.max_text_len)),
            DomSignal::Scroll { x, y } => {
                if !self.scroll.admit(now) {
                    trace!("scroll throttled");
                    return false;
                }
                RemotePayload::new(kinds::SCROLL).with("x", x).with("y", y)
            }
            DomSignal::Input { tag, id, value } => {
                if !self.input.admit(now) {
                    trace!("input throttled");
                    return false;
                }
                RemotePayload::new(kinds::INPUT)
                    .with("tag", tag)
                    .with("id", id)
                    .with("value", truncate_text(&value, self.max_text_len))
            }
            DomSignal::RuntimeError {
                message,
                filename,
                lineno,
                colno,
            } => RemotePayload::new(kinds::ERROR)
                .with("message", message)
                .with("filename", filename)
                .with("lineno", lineno)
                .with("colno", colno),
        };

        self.forwarder.forward(payload).await;
        true
    }

    /// Redirect a navigation into the current page and return the URL to load.
    ///
    /// New-window requests never open a window of their own, so navigation
    /// cannot leave the monitored page unrecorded.
    pub async fn intercept_navigation(&mut self, request: NavigationRequest) -> String {
        if self.active {
            let payload = RemotePayload::new(kinds::NAVIGATION)
                .with("url", request.url())
                .with("source", request.source());
            self.forwarder.forward(payload).await;
        }
        match request {
            NavigationRequest::Anchor(url) | NavigationRequest::NewWindow(url) => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    type PageSender = mpsc::UnboundedSender<RemotePayload>;

    fn capture() -> (EventCapture<PageSender>, mpsc::UnboundedReceiver<RemotePayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventCapture::new(tx, &CaptureConfig::default()), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<RemotePayload>) -> Vec<RemotePayload> {
        let mut out = Vec::new();
        while let Ok(p) = rx.try_recv() {
            out.push(p);
        }
        out
    }

    #[tokio::test]
    async fn test_inactive_capture_forwards_nothing() {
        let (mut capture, mut rx) = capture();
        let forwarded = capture.observe(DomSignal::Scroll { x: 0, y: 10 }, Instant::now()).await;
        assert!(!forwarded);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_markers_only_on_transition() {
        let (mut capture, mut rx) = capture();
        capture.set_active(true).await;
        capture.set_active(true).await;
        capture.set_active(false).await;
        capture.set_active(false).await;

        let kinds: Vec<_> = drain(&mut rx).into_iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec!["recording-start", "recording-stop"]);
    }

    #[tokio::test]
    async fn test_scroll_burst_collapses() {
        let (mut capture, mut rx) = capture();
        capture.set_active(true).await;
        drain(&mut rx);

        let start = Instant::now();
        for ms in (0..1000).step_by(20) {
            capture
                .observe(DomSignal::Scroll { x: 0, y: ms }, start + Duration::from_millis(ms as u64))
                .await;
        }

        let ys: Vec<_> = drain(&mut rx).iter().map(|p| p.field("y").cloned().unwrap()).collect();
        assert_eq!(ys, vec![json!(0), json!(200), json!(400), json!(600), json!(800)]);
    }

    #[tokio::test]
    async fn test_input_throttle_and_truncation() {
        let (mut capture, mut rx) = capture();
        capture.set_active(true).await;
        drain(&mut rx);

        let start = Instant::now();
        let long = "x".repeat(250);
        let input = |value: &str| DomSignal::Input {
            tag: "INPUT".into(),
            id: "q".into(),
            value: value.into(),
        };
        assert!(capture.observe(input(&long), start).await);
        assert!(!capture.observe(input("dropped"), start + Duration::from_millis(29)).await);
        assert!(capture.observe(input("kept"), start + Duration::from_millis(30)).await);

        let records = drain(&mut rx);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("value").unwrap().as_str().unwrap().len(), 100);
        assert_eq!(records[1].field("value"), Some(&json!("kept")));
    }

    #[tokio::test]
    async fn test_click_fields() {
        let (mut capture, mut rx) = capture();
        capture.set_active(true).await;
        drain(&mut rx);

        capture
            .observe(
                DomSignal::Click {
                    x: 10,
                    y: 20,
                    tag: "BUTTON".into(),
                    id: "go".into(),
                    class_name: "primary".into(),
                    text: "Submit".into(),
                },
                Instant::now(),
            )
            .await;

        let record = drain(&mut rx).remove(0);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "click",
                "x": 10,
                "y": 20,
                "tag": "BUTTON",
                "id": "go",
                "className": "primary",
                "text": "Submit"
            })
        );
    }

    #[tokio::test]
    async fn test_navigation_is_redirected_and_recorded() {
        let (mut capture, mut rx) = capture();

        let url = capture
            .intercept_navigation(NavigationRequest::NewWindow("https://a.test/next".into()))
            .await;
        assert_eq!(url, "https://a.test/next");
        assert!(drain(&mut rx).is_empty());

        capture.set_active(true).await;
        drain(&mut rx);
        capture
            .intercept_navigation(NavigationRequest::Anchor("https://a.test/b".into()))
            .await;
        let record = drain(&mut rx).remove(0);
        assert_eq!(record.kind, "navigation");
        assert_eq!(record.field("source"), Some(&json!("anchor")));
    }
}
