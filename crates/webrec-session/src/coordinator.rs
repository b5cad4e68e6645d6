//! Start/stop state machine over every monitored window.

use crate::api::{
    FolderSelection, OpenUrlResponse, SelectFolderResponse, StartResponse, StatusResponse,
    StopResponse, WindowStatus,
};
use crate::navigation::validate_url;
use crate::registry::{Registration, SessionRegistry};
use crate::session::Session;
use crate::RecorderError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};
use webrec_capture::{CaptureConfig, RecordForwarder, SinkHandle, WindowHost};
use webrec_common_config::WebrecConfig;
use webrec_common_core::WindowId;
use webrec_common_log::spans::session_span;
use webrec_compose::{CompositionOutcome, CompositionReport, VideoComposer};
use webrec_record_types::{kinds, EventRecord, RemotePayload};

/// Buffered composition reports per subscriber.
const REPORT_CHANNEL_CAPACITY: usize = 64;

/// Result of a successful start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub run_dir: PathBuf,
    /// False when the window was already recording.
    pub newly_started: bool,
}

/// Drives recording sessions for every window of a host.
///
/// Start, stop and window close on one window are serialized by that
/// window's lifecycle lock, so concurrent starts never create two run
/// directories. The session table itself is only locked for lookups and
/// inserts; teardown of one window never blocks another.
pub struct Coordinator {
    host: Arc<dyn WindowHost>,
    capture: CaptureConfig,
    composer: Arc<VideoComposer>,
    root: RwLock<Option<PathBuf>>,
    sessions: StdMutex<SessionRegistry>,
    lifecycles: StdMutex<HashMap<WindowId, Arc<Mutex<()>>>>,
    reports: broadcast::Sender<CompositionReport>,
    compositions: StdMutex<Vec<JoinHandle<CompositionReport>>>,
}

impl Coordinator {
    pub fn new(host: Arc<dyn WindowHost>, config: &WebrecConfig) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        Self {
            host,
            capture: CaptureConfig::from(&config.recording),
            composer: Arc::new(VideoComposer::new(config.encoder.clone())),
            root: RwLock::new(config.recording.destination_root.clone()),
            sessions: StdMutex::new(SessionRegistry::new()),
            lifecycles: StdMutex::new(HashMap::new()),
            reports,
            compositions: StdMutex::new(Vec::new()),
        }
    }

    /// Current destination root.
    pub fn destination_root(&self) -> Option<PathBuf> {
        self.root.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply the folder picker's answer. Cancelling keeps the current root.
    pub fn select_destination(&self, selection: FolderSelection) -> SelectFolderResponse {
        match selection {
            FolderSelection::Selected(path) => {
                info!(root = %path.display(), "destination root selected");
                *self.root.write().unwrap_or_else(PoisonError::into_inner) = Some(path.clone());
                SelectFolderResponse {
                    canceled: false,
                    path: Some(path),
                }
            }
            FolderSelection::Canceled => SelectFolderResponse {
                canceled: true,
                path: None,
            },
        }
    }

    /// Start recording `window_id`.
    pub async fn start(&self, window_id: WindowId) -> StartResponse {
        match self.start_session(window_id).await {
            Ok(StartOutcome {
                run_dir,
                newly_started: true,
            }) => StartResponse::started(run_dir),
            Ok(StartOutcome { run_dir, .. }) => StartResponse::already_recording(run_dir),
            Err(e) => {
                warn!(window = %window_id, "start refused: {}", e);
                StartResponse::failed(&e)
            }
        }
    }

    /// Start recording and return the run directory.
    ///
    /// Starting a window that is already recording returns its current run
    /// directory and creates nothing.
    pub async fn start_session(&self, window_id: WindowId) -> Result<StartOutcome, RecorderError> {
        async {
            if !self.host.is_alive(window_id) {
                return Err(RecorderError::WindowUnavailable { window_id });
            }
            let root = self.destination_root().ok_or(RecorderError::Configuration)?;

            let gate = self.lifecycle(window_id);
            let _lifecycle = gate.lock().await;

            let outcome = {
                let mut registry = self.registry();
                let registration = registry.create(window_id, || {
                    Session::open(window_id, &root, &self.host, &self.capture)
                })?;
                match registration {
                    Registration::AlreadyActive(session) => {
                        debug!(run_dir = %session.run_dir().display(), "already recording");
                        StartOutcome {
                            run_dir: session.run_dir().to_path_buf(),
                            newly_started: false,
                        }
                    }
                    Registration::Created(session) => {
                        info!(run_dir = %session.run_dir().display(), "recording started");
                        StartOutcome {
                            run_dir: session.run_dir().to_path_buf(),
                            newly_started: true,
                        }
                    }
                }
            };

            if outcome.newly_started {
                self.host.send_recording_toggle(window_id, true);
            }
            Ok(outcome)
        }
        .instrument(session_span(window_id))
        .await
    }

    /// Stop recording `window_id`. A window that is not recording is left alone.
    ///
    /// Returns once the streams are down; composition continues in the
    /// background and reports through [`subscribe_compositions`](Self::subscribe_compositions).
    pub async fn stop(&self, window_id: WindowId) -> StopResponse {
        async {
            let gate = self.lifecycle(window_id);
            let _lifecycle = gate.lock().await;

            let session = {
                let mut registry = self.registry();
                match registry.get(window_id) {
                    Some(session) if session.is_recording() => session.halt(),
                    _ => {
                        debug!("stop ignored: not recording");
                        return;
                    }
                }
                registry.remove(window_id)
            };
            let Some(session) = session else {
                return;
            };

            let (paths, sinks) = session.teardown(self.host.as_ref()).await;
            info!(run_dir = %paths.run_dir.display(), "recording stopped");
            self.spawn_composition(window_id, paths.run_dir, sinks);
        }
        .instrument(session_span(window_id))
        .await;

        StopResponse::stopped()
    }

    /// The host destroyed `window_id`.
    ///
    /// Recording is switched off before the first await, even while another
    /// start or stop on the window is in flight. The session is then torn
    /// down as for a stop.
    pub async fn window_closed(&self, window_id: WindowId) {
        async {
            let was_recording = {
                let registry = self.registry();
                match registry.get(window_id) {
                    Some(session) => {
                        let was_recording = session.is_recording();
                        session.halt();
                        session.cancel_streams();
                        was_recording
                    }
                    None => false,
                }
            };

            let gate = self.lifecycle(window_id);
            let lifecycle = gate.lock().await;
            let session = self.registry().remove(window_id);
            if let Some(session) = session {
                let (paths, sinks) = session.teardown(self.host.as_ref()).await;
                info!(run_dir = %paths.run_dir.display(), "window closed while recording");
                if was_recording {
                    self.spawn_composition(window_id, paths.run_dir, sinks);
                }
            }

            drop(lifecycle);
            self.lifecycles
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&window_id);
        }
        .instrument(session_span(window_id))
        .await
    }

    /// Stop every recording session.
    pub async fn stop_all(&self) {
        let ids = self.registry().ids();
        for id in ids {
            self.stop(id).await;
        }
    }

    /// Accept a record pushed by a window's page.
    ///
    /// The host stamps `ts` on receipt. Records for a window that is not
    /// recording are dropped, as are page keydowns: keys come from the
    /// host's input stream only.
    pub async fn record_event(&self, window_id: WindowId, payload: RemotePayload) {
        if payload.kind == kinds::KEYDOWN {
            debug!(window = %window_id, "page keydown ignored");
            return;
        }
        let (writer, record) = {
            let registry = self.registry();
            match registry.get(window_id) {
                Some(session) if session.is_recording() => (
                    session.events().clone(),
                    EventRecord::stamp(payload, webrec_capture::receipt_time()),
                ),
                _ => {
                    debug!(
                        window = %window_id,
                        kind = %payload.kind,
                        "record dropped: not recording"
                    );
                    return;
                }
            }
        };
        writer.record(&record).await;
    }

    /// Whether `window_id` is currently recording.
    pub fn is_recording(&self, window_id: WindowId) -> bool {
        self.registry()
            .get(window_id)
            .is_some_and(Session::is_recording)
    }

    /// Root and per-window state for every live window.
    pub fn status(&self) -> StatusResponse {
        let registry = self.registry();
        let sessions = self
            .host
            .live_windows()
            .into_iter()
            .map(|window_id| WindowStatus {
                window_id,
                current_url: self.host.current_url(window_id),
                recording: registry.get(window_id).is_some_and(Session::is_recording),
            })
            .collect();

        StatusResponse {
            root: self.destination_root(),
            sessions,
        }
    }

    /// Open a new monitored window on `raw`, which must be an http(s) URL.
    pub fn open_url(&self, raw: &str) -> OpenUrlResponse {
        let url = match validate_url(raw) {
            Ok(url) => url,
            Err(e) => return OpenUrlResponse::failed(e.to_string()),
        };
        match self.host.open_window(url.as_str()) {
            Ok(window_id) => {
                info!(window = %window_id, url = %url, "window opened");
                OpenUrlResponse::opened(window_id)
            }
            Err(e) => {
                warn!(url = %url, "failed to open window: {}", e);
                OpenUrlResponse::failed(e.to_string())
            }
        }
    }

    /// Composition reports for every stop from now on.
    pub fn subscribe_compositions(&self) -> broadcast::Receiver<CompositionReport> {
        self.reports.subscribe()
    }

    /// Wait for every composition started so far.
    pub async fn wait_for_compositions(&self) -> Vec<CompositionReport> {
        let pending = std::mem::take(
            &mut *self.compositions.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let mut reports = Vec::with_capacity(pending.len());
        for handle in pending {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => error!("composition task failed: {}", e),
            }
        }
        reports
    }

    /// Composition tasks still tracked. Finished tasks are reaped whenever a
    /// new composition starts.
    pub fn pending_compositions(&self) -> usize {
        self.compositions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn registry(&self) -> MutexGuard<'_, SessionRegistry> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lifecycle(&self, window_id: WindowId) -> Arc<Mutex<()>> {
        self.lifecycles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(window_id)
            .or_default()
            .clone()
    }

    fn spawn_composition(&self, window_id: WindowId, run_dir: PathBuf, sinks: Vec<SinkHandle>) {
        let composer = self.composer.clone();
        let reports = self.reports.clone();

        let handle = tokio::spawn(
            async move {
                for sink in sinks {
                    match sink.await {
                        Ok(stats) if stats.failed > 0 => {
                            warn!(failed = stats.failed, "some records were discarded")
                        }
                        Ok(_) => {}
                        Err(e) => error!("sink task failed: {}", e),
                    }
                }

                let outcome = CompositionOutcome::from(composer.compose(&run_dir).await);
                if let CompositionOutcome::Failed { reason } = &outcome {
                    warn!(run_dir = %run_dir.display(), "video composition failed: {}", reason);
                }

                let report = CompositionReport {
                    window_id,
                    run_dir,
                    outcome,
                };
                let _ = reports.send(report.clone());
                report
            }
            .instrument(session_span(window_id)),
        );

        let mut pending = self.compositions.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }
}

/// Forwards a page's records to the coordinator as that window.
pub struct RemoteLink {
    coordinator: Arc<Coordinator>,
    window_id: WindowId,
}

impl RemoteLink {
    pub fn new(coordinator: Arc<Coordinator>, window_id: WindowId) -> Self {
        Self {
            coordinator,
            window_id,
        }
    }
}

#[async_trait]
impl RecordForwarder for RemoteLink {
    async fn forward(&self, payload: RemotePayload) {
        self.coordinator.record_event(self.window_id, payload).await;
    }
}
