//! Environment variable handling.

use crate::types::WebrecConfig;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    pub const WEBREC_DESTINATION_ROOT: &str = "WEBREC_DESTINATION_ROOT";
    pub const WEBREC_FFMPEG: &str = "WEBREC_FFMPEG";
    pub const WEBREC_LOG_LEVEL: &str = "WEBREC_LOG_LEVEL";
}

/// Environment configuration.
pub struct Environment {
    _guard: (), // Prevent construction outside module
}

impl Environment {
    /// Load `.env.local` and `.env` from the working directory.
    ///
    /// Variables already set are never replaced, so the process environment
    /// wins over `.env.local`, which wins over `.env`. Missing files are
    /// fine; a malformed one is an error.
    pub fn init() -> Result<Self, EnvError> {
        Self::load_from(Path::new("."))
    }

    /// As [`init`](Self::init), reading the files from `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, EnvError> {
        for file in [".env.local", ".env"] {
            match dotenvy::from_path(dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Self { _guard: () })
    }

    /// Get an optional string variable; empty values count as unset.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        Self::get(var).unwrap_or_else(|| default.to_string())
    }
}

/// Apply `WEBREC_*` overrides on top of a loaded configuration.
pub fn apply_overrides(config: &mut WebrecConfig) {
    if let Some(root) = Environment::get(vars::WEBREC_DESTINATION_ROOT) {
        config.recording.destination_root = Some(PathBuf::from(root));
    }
    if let Some(program) = Environment::get(vars::WEBREC_FFMPEG) {
        config.encoder.program = program;
    }
}
