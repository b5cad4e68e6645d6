use std::io;
use std::path::PathBuf;
use webrec_capture::CaptureError;
use webrec_common_core::WindowId;

/// Errors surfaced to callers of the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// No destination root has been selected.
    #[error("select folder first")]
    Configuration,

    #[error("window {window_id} does not exist or is closed")]
    WindowUnavailable { window_id: WindowId },

    #[error("{message}")]
    Validation { message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl RecorderError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<webrec_common_core::Error> for RecorderError {
    fn from(err: webrec_common_core::Error) -> Self {
        match err {
            webrec_common_core::Error::FileSystem { path, source, .. } => Self::Io { path, source },
            webrec_common_core::Error::Io(source) => Self::Io {
                path: PathBuf::new(),
                source,
            },
            other => Self::Io {
                path: PathBuf::new(),
                source: io::Error::other(other.to_string()),
            },
        }
    }
}
