//! One window's recording session.

use crate::RecorderError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use webrec_capture::{
    CaptureConfig, EventLogWriter, FrameCapture, FrameWriter, InputCapture, MotionListener,
    NetworkCapture, SessionFlags, SinkHandle, WindowHost,
};
use webrec_common_async::{CaptureScope, StreamGuard};
use webrec_common_core::{Timestamp, WindowId};
use webrec_record_types::{run_dir_name, RunPaths};

#[derive(Debug)]
struct Streams {
    network: StreamGuard,
    input: StreamGuard,
    motion: StreamGuard,
    frames: StreamGuard,
}

/// Live recording state for one window.
///
/// Owns the run directory's sinks and the capture streams feeding them.
/// Built by [`Session::open`], consumed by teardown.
#[derive(Debug)]
pub struct Session {
    window_id: WindowId,
    paths: RunPaths,
    started_at: Timestamp,
    flags: Arc<SessionFlags>,
    scope: CaptureScope,
    events: EventLogWriter,
    streams: Streams,
    sinks: Vec<SinkHandle>,
}

impl Session {
    /// Create the run directory under `root` and start every capture stream.
    pub fn open(
        window_id: WindowId,
        root: &Path,
        host: &Arc<dyn WindowHost>,
        config: &CaptureConfig,
    ) -> Result<Self, RecorderError> {
        let unavailable = |_| RecorderError::WindowUnavailable { window_id };
        let input_rx = host.subscribe_input(window_id).map_err(unavailable)?;
        let motion_rx = host.subscribe_motion(window_id).map_err(unavailable)?;
        let network_rx = host.subscribe_network();

        let started_at = Timestamp::now();
        let dir_name = run_dir_name(window_id, &started_at.run_stamp());
        let run_dir = webrec_common_fs::create_unique_dir(root, &dir_name)?;
        let paths = RunPaths::new(run_dir);
        webrec_common_fs::ensure_dir(&paths.frames_dir)?;

        let (events, events_sink) = EventLogWriter::open(&paths.event_log, &config.sink)?;
        let (network_log, network_sink) = EventLogWriter::open(&paths.network_log, &config.sink)?;
        let (frames, frames_sink) =
            FrameWriter::start(&paths.frames_dir, config.sink.queue_capacity);

        let flags = Arc::new(SessionFlags::new());
        flags.set_recording(true);

        let scope = CaptureScope::new(format!("window-{window_id}"));
        let streams = Streams {
            network: NetworkCapture::new(window_id, flags.clone(), network_log)
                .start(&scope, network_rx),
            input: InputCapture::new(flags.clone(), events.clone()).start(&scope, input_rx),
            motion: MotionListener::new(flags.clone()).start(&scope, motion_rx),
            frames: FrameCapture::new(
                window_id,
                host.clone(),
                flags.clone(),
                frames,
                config.frame_period,
            )
            .start(&scope),
        };

        Ok(Self {
            window_id,
            paths,
            started_at,
            flags,
            scope,
            events,
            streams,
            sinks: vec![events_sink, network_sink, frames_sink],
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn run_dir(&self) -> &Path {
        &self.paths.run_dir
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn is_recording(&self) -> bool {
        self.flags.is_recording()
    }

    pub fn is_moving(&self) -> bool {
        self.flags.is_moving()
    }

    pub(crate) fn events(&self) -> &EventLogWriter {
        &self.events
    }

    /// Stop accepting records. Runs before any teardown step.
    pub(crate) fn halt(&self) {
        self.flags.set_recording(false);
    }

    /// Cancel every stream at once, without waiting.
    pub(crate) fn cancel_streams(&self) {
        self.scope.cancel();
    }

    /// Release the streams in order and hand back the run's sinks.
    ///
    /// The sinks resolve once every queued record has been written.
    pub(crate) async fn teardown(self, host: &dyn WindowHost) -> (RunPaths, Vec<SinkHandle>) {
        self.halt();
        let Self {
            window_id,
            paths,
            scope,
            events,
            streams,
            sinks,
            ..
        } = self;

        streams.frames.release().await;
        streams.motion.release().await;
        streams.input.release().await;
        if host.is_alive(window_id) {
            host.send_recording_toggle(window_id, false);
        }
        streams.network.release().await;

        drop(events);
        drop(scope);
        debug!(run_dir = %paths.run_dir.display(), "session torn down");
        (paths, sinks)
    }
}
