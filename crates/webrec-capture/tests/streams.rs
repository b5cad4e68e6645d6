mod common;

use common::StubHost;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use webrec_capture::{
    EventLogWriter, FrameCapture, FrameWriter, InputCapture, MotionListener, MotionSignal,
    NetworkCapture, SessionFlags, SinkConfig, WindowHost,
};
use webrec_common_async::CaptureScope;
use webrec_common_core::WindowId;
use webrec_record_types::{KeyModifiers, NetworkCompletion, RawKeyInput};
use webrec_test_utils::{count_files, read_ndjson};

fn completion(window: u32, url: &str) -> NetworkCompletion {
    NetworkCompletion {
        window_id: WindowId::new(window),
        method: "GET".into(),
        url: url.into(),
        status_code: 200,
        from_cache: false,
    }
}

fn recording_flags() -> Arc<SessionFlags> {
    let flags = Arc::new(SessionFlags::new());
    flags.set_recording(true);
    flags
}

#[tokio::test(start_paused = true)]
async fn frame_count_tracks_duration_over_period() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(StubHost::new(1));
    let flags = recording_flags();
    let scope = CaptureScope::new("window-1");

    let (writer, sink) = FrameWriter::start(dir.path(), 256);
    let guard = FrameCapture::new(host.id, host.clone(), flags.clone(), writer, Duration::from_millis(33))
        .start(&scope);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    guard.release().await;
    let stats = sink.await.unwrap();

    // floor(1000 / 33) = 30, within one either way.
    let frames = count_files(dir.path(), "png") as u64;
    assert!((29..=31).contains(&frames), "got {frames} frames");
    assert_eq!(stats.written, frames);
}

#[tokio::test(start_paused = true)]
async fn no_frames_while_moving() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(StubHost::new(1));
    let flags = recording_flags();
    let scope = CaptureScope::new("window-1");

    let (writer, sink) = FrameWriter::start(dir.path(), 256);
    let motion = MotionListener::new(flags.clone()).start(&scope, host.subscribe_motion(host.id).unwrap());
    let frames = FrameCapture::new(host.id, host.clone(), flags.clone(), writer, Duration::from_millis(50))
        .start(&scope);

    // Ticks at 0, 50, 100 | moving 120..320 | 350, 400, 450.
    tokio::time::sleep(Duration::from_millis(120)).await;
    host.motion.send(MotionSignal::MoveStarted).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    host.motion.send(MotionSignal::MoveEnded).unwrap();
    tokio::time::sleep(Duration::from_millis(160)).await;

    frames.release().await;
    motion.release().await;
    sink.await.unwrap();

    assert_eq!(count_files(dir.path(), "png"), 6);
    // Indices stay contiguous: skipped ticks never take an index.
    for i in 0..6 {
        assert!(dir.path().join(format!("{i:05}.png")).exists());
    }
}

#[tokio::test(start_paused = true)]
async fn failed_snapshots_leave_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(StubHost::new(1));
    let flags = recording_flags();
    let scope = CaptureScope::new("window-1");

    let (writer, sink) = FrameWriter::start(dir.path(), 256);
    let guard = FrameCapture::new(host.id, host.clone(), flags.clone(), writer, Duration::from_millis(100))
        .start(&scope);

    // Ticks at 0 and 100 succeed, 200 fails, 300 succeeds.
    tokio::time::sleep(Duration::from_millis(150)).await;
    host.fail_captures.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    host.fail_captures.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    guard.release().await;
    sink.await.unwrap();

    assert!(dir.path().join("00000.png").exists());
    assert!(dir.path().join("00001.png").exists());
    assert!(!dir.path().join("00002.png").exists());
    assert!(dir.path().join("00003.png").exists());
}

#[tokio::test(start_paused = true)]
async fn no_frames_when_not_recording() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(StubHost::new(1));
    let flags = Arc::new(SessionFlags::new());
    let scope = CaptureScope::new("window-1");

    let (writer, sink) = FrameWriter::start(dir.path(), 256);
    let guard = FrameCapture::new(host.id, host.clone(), flags, writer, Duration::from_millis(33)).start(&scope);
    tokio::time::sleep(Duration::from_millis(500)).await;
    guard.release().await;
    sink.await.unwrap();

    assert_eq!(count_files(dir.path(), "png"), 0);
    assert_eq!(host.captures.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn snapshot_finishing_after_stop_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(StubHost::new(1));
    let flags = recording_flags();
    *host.stop_during_capture.lock().unwrap() = Some(flags.clone());
    let scope = CaptureScope::new("window-1");

    let (writer, sink) = FrameWriter::start(dir.path(), 256);
    let guard = FrameCapture::new(host.id, host.clone(), flags.clone(), writer, Duration::from_millis(50))
        .start(&scope);
    tokio::time::sleep(Duration::from_millis(200)).await;
    guard.release().await;
    let stats = sink.await.unwrap();

    assert!(!flags.is_recording());
    assert_eq!(host.captures.load(Ordering::SeqCst), 1);
    assert_eq!(count_files(dir.path(), "png"), 0);
    assert_eq!(stats.written, 0);
}

#[tokio::test]
async fn network_filters_by_window_and_recording() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.ndjson");
    let host = StubHost::new(4);
    let flags = recording_flags();
    let scope = CaptureScope::new("window-4");

    let (writer, sink) = EventLogWriter::open(&path, &SinkConfig::default()).unwrap();
    let guard = NetworkCapture::new(host.id, flags.clone(), writer).start(&scope, host.subscribe_network());

    host.network.send(completion(4, "https://a.test/mine")).unwrap();
    host.network.send(completion(9, "https://a.test/other")).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Completes after stop.
    flags.set_recording(false);
    host.network.send(completion(4, "https://a.test/late")).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    guard.release().await;
    sink.await.unwrap();

    let lines = read_ndjson(&path);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], "network");
    assert_eq!(lines[0]["url"], "https://a.test/mine");
    assert_eq!(lines[0]["statusCode"], 200);
    assert!(lines[0]["timestamp"].is_i64());
}

#[tokio::test]
async fn keydown_records_carry_modifiers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.ndjson");
    let host = StubHost::new(2);
    let flags = recording_flags();
    let scope = CaptureScope::new("window-2");

    let (writer, sink) = EventLogWriter::open(&path, &SinkConfig::default()).unwrap();
    let guard = InputCapture::new(flags, writer).start(&scope, host.subscribe_input(host.id).unwrap());

    let before = webrec_capture::receipt_time();
    host.input
        .send(RawKeyInput::down(
            "Enter",
            "Enter",
            KeyModifiers {
                shift: true,
                ..Default::default()
            },
        ))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    guard.release().await;
    sink.await.unwrap();
    let after = webrec_capture::receipt_time();

    let lines = read_ndjson(&path);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line["type"], "keydown");
    assert_eq!(line["key"], "Enter");
    assert_eq!(line["shift"], true);
    assert_eq!(line["ctrl"], false);
    let ts = line["ts"].as_i64().unwrap();
    assert!(before <= ts && ts <= after);
}
