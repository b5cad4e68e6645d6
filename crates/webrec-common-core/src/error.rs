//! Error types for webrec.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type shared by the webrec utility crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error with custom message.
    #[error("{0}")]
    Generic(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File system error tied to a concrete path.
    #[error("{message}: {}", path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a new generic error.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    /// The path involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileSystem { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias using webrec's Error.
pub type Result<T> = std::result::Result<T, Error>;
