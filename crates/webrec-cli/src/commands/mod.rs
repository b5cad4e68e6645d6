//! Command implementations.

mod compose;
mod config;
mod doctor;
mod inspect;

pub use compose::ComposeCommand;
pub use config::ConfigCommand;
pub use doctor::DoctorCommand;
pub use inspect::InspectCommand;

use std::path::Path;

use crate::error::CliError;

/// Reject paths that are not directories before touching them.
fn require_run_dir(path: &Path) -> Result<(), CliError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::validation_with_hint(
            format!("not a run directory: {}", path.display()),
            "pass a `record-<window>-<timestamp>` directory",
        ))
    }
}
