//! Post-hoc video composition.
//!
//! After a session stops, its numbered frames are handed to an external
//! encoder that writes `recording.mp4` next to them. An empty frames
//! directory is a normal outcome, not an error. Encoder failures leave the
//! frames untouched for manual recovery (`webrec compose <run-dir>`).

mod command;
mod composer;
mod inventory;
mod report;

pub use command::{EncoderCommandBuilder, EVEN_DIMENSIONS_FILTER};
pub use composer::{ComposeOutcome, VideoComposer};
pub use inventory::FrameInventory;
pub use report::{CompositionOutcome, CompositionReport};

use std::path::PathBuf;

/// Composition errors.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("failed to start encoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {status}: {stderr}")]
    EncoderFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("encoder reported success but {} is missing", .0.display())]
    MissingOutput(PathBuf),

    #[error(transparent)]
    Io(#[from] webrec_common_core::Error),
}
