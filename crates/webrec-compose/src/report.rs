use crate::composer::ComposeOutcome;
use crate::ComposeError;
use serde::Serialize;
use std::path::PathBuf;
use webrec_common_core::WindowId;

/// Final state of one composition job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompositionOutcome {
    Skipped,
    Completed { output: PathBuf },
    Failed { reason: String },
}

impl From<Result<ComposeOutcome, ComposeError>> for CompositionOutcome {
    fn from(result: Result<ComposeOutcome, ComposeError>) -> Self {
        match result {
            Ok(ComposeOutcome::Skipped) => Self::Skipped,
            Ok(ComposeOutcome::Completed { output }) => Self::Completed { output },
            Err(e) => Self::Failed { reason: e.to_string() },
        }
    }
}

/// Composition result for a stopped session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionReport {
    pub window_id: WindowId,
    pub run_dir: PathBuf,
    pub outcome: CompositionOutcome,
}

impl CompositionReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, CompositionOutcome::Failed { .. })
    }
}
