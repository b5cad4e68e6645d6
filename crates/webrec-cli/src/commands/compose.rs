//! Compose command implementation.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use webrec_compose::{ComposeError, ComposeOutcome, CompositionOutcome, VideoComposer};

use super::require_run_dir;
use crate::cli::CommandContext;
use crate::error::CliError;

/// Compose a run's frames into a video with the configured encoder
#[derive(Debug, Parser)]
pub struct ComposeCommand {
    /// Run directory holding `frames/`
    pub run_dir: PathBuf,

    /// Replace an existing video
    #[arg(long)]
    pub overwrite: bool,
}

impl ComposeCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        require_run_dir(&self.run_dir)?;
        info!(
            run_dir = %self.run_dir.display(),
            program = %ctx.config.encoder.program,
            "composing"
        );

        let outcome = VideoComposer::new(ctx.config.encoder.clone())
            .with_overwrite(self.overwrite)
            .compose(&self.run_dir)
            .await?;

        if ctx.is_json() {
            return ctx.print_json(&CompositionOutcome::from(Ok::<_, ComposeError>(outcome)));
        }
        if !ctx.quiet {
            match outcome {
                ComposeOutcome::Skipped => println!("no frames captured; nothing to compose"),
                ComposeOutcome::Completed { output } => {
                    println!("video written: {}", output.display())
                }
            }
        }
        Ok(())
    }
}
