use crate::command::EncoderCommandBuilder;
use crate::inventory::FrameInventory;
use crate::ComposeError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn, Instrument};
use webrec_common_config::EncoderConfig;
use webrec_common_log::spans::{compose_span, Timer};
use webrec_record_types::RunPaths;

/// Lines of encoder stderr kept in an error.
const STDERR_TAIL_LINES: usize = 20;

/// Successful composition results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeOutcome {
    /// No frames were captured; nothing to encode.
    Skipped,
    /// The video was written.
    Completed { output: PathBuf },
}

/// Turns a run's frames into one video with an external encoder.
#[derive(Debug, Clone)]
pub struct VideoComposer {
    config: EncoderConfig,
    overwrite: bool,
}

impl VideoComposer {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            overwrite: false,
        }
    }

    /// Replace an existing video instead of failing.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Compose `run_dir/frames` into `run_dir/<output_file>`.
    ///
    /// Frames are never modified or removed, whatever the outcome.
    pub async fn compose(&self, run_dir: &Path) -> Result<ComposeOutcome, ComposeError> {
        self.compose_inner(run_dir).instrument(compose_span(run_dir)).await
    }

    async fn compose_inner(&self, run_dir: &Path) -> Result<ComposeOutcome, ComposeError> {
        let paths = RunPaths::new(run_dir);
        let inventory = FrameInventory::scan(&paths.frames_dir)?;
        if inventory.is_empty() {
            info!("no frames captured, skipping video composition");
            return Ok(ComposeOutcome::Skipped);
        }
        if !inventory.gaps.is_empty() {
            warn!(
                frames = inventory.count,
                missing = inventory.gaps.len(),
                encodable = inventory.encodable(),
                "frame sequence has gaps; the encoder stops at the first missing index"
            );
        }

        let output = paths.video(&self.config.output_file);
        let args =
            EncoderCommandBuilder::from_config(&self.config, &paths.frames_dir, output.clone())
                .with_start_number(inventory.first)
                .with_overwrite(self.overwrite)
                .build();

        let timer = Timer::start("encode");
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&args)
            .current_dir(run_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = cmd.output().await.map_err(|e| ComposeError::Spawn {
            program: self.config.program.clone(),
            source: e,
        })?;
        let elapsed = timer.finish();

        if !result.status.success() {
            let stderr = stderr_tail(&result.stderr);
            warn!(status = %result.status, "encoder failed; frames left in place");
            return Err(ComposeError::EncoderFailed {
                status: result.status,
                stderr,
            });
        }
        if !output.is_file() {
            return Err(ComposeError::MissingOutput(output));
        }

        info!(
            output = %output.display(),
            frames = inventory.count,
            elapsed_ms = elapsed.as_millis() as u64,
            "video composed"
        );
        Ok(ComposeOutcome::Completed { output })
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
