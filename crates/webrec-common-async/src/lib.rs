//! Async runtime utilities.
//!
//! Besides the runtime builder this crate owns the structured-cancellation
//! handles the recorder uses for its capture streams: a [`CaptureScope`]
//! per session and one [`StreamGuard`] per spawned stream.

mod scope;

pub use scope::{CaptureScope, StreamGuard};

use tokio::runtime::{Builder, Runtime};

/// Configuration for the webrec runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (0 = num_cpus).
    pub worker_threads: usize,
    /// Thread name prefix.
    pub thread_name: String,
    /// Enable I/O driver.
    pub enable_io: bool,
    /// Enable time driver.
    pub enable_time: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0, // Use num_cpus
            thread_name: "webrec".to_string(),
            enable_io: true,
            enable_time: true,
        }
    }
}

/// Build a configured Tokio runtime.
pub fn build_runtime(config: RuntimeConfig) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();

    if config.worker_threads > 0 {
        builder.worker_threads(config.worker_threads);
    }

    builder.thread_name(&config.thread_name);

    if config.enable_io {
        builder.enable_io();
    }

    if config.enable_time {
        builder.enable_time();
    }

    builder.build()
}
