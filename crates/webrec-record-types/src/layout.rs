//! Files that make up one run directory.

use std::path::{Path, PathBuf};
use webrec_common_core::WindowId;

/// Event log file name.
pub const EVENT_LOG: &str = "events.ndjson";
/// Network log file name.
pub const NETWORK_LOG: &str = "network.ndjson";
/// Frames subdirectory name.
pub const FRAMES_DIR: &str = "frames";

/// Directory name for a run: `record-<window id>-<stamp>`.
pub fn run_dir_name(window_id: WindowId, stamp: &str) -> String {
    format!("record-{window_id}-{stamp}")
}

/// Paths inside a run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub run_dir: PathBuf,
    pub event_log: PathBuf,
    pub network_log: PathBuf,
    pub frames_dir: PathBuf,
}

impl RunPaths {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        let run_dir = run_dir.into();
        Self {
            event_log: run_dir.join(EVENT_LOG),
            network_log: run_dir.join(NETWORK_LOG),
            frames_dir: run_dir.join(FRAMES_DIR),
            run_dir,
        }
    }

    /// Where the composed video for this run goes.
    pub fn video(&self, output_file: impl AsRef<Path>) -> PathBuf {
        self.run_dir.join(output_file)
    }
}
