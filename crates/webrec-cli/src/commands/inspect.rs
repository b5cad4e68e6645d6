//! Inspect command implementation.

use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use webrec_compose::FrameInventory;
use webrec_record_types::RunPaths;

use super::require_run_dir;
use crate::cli::CommandContext;
use crate::error::CliError;

/// Summarize a run directory
#[derive(Debug, Parser)]
pub struct InspectCommand {
    /// Run directory to inspect
    pub run_dir: PathBuf,
}

/// Line counts for one NDJSON log.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogSummary {
    records: usize,
    /// Records by `type`.
    by_type: BTreeMap<String, usize>,
    /// Lines that are not JSON objects.
    malformed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    run_dir: PathBuf,
    events: LogSummary,
    network: LogSummary,
    frames: FrameInventory,
    video: Option<PathBuf>,
}

impl InspectCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        require_run_dir(&self.run_dir)?;
        let paths = RunPaths::new(&self.run_dir);

        let video = paths.video(&ctx.config.encoder.output_file);
        let summary = RunSummary {
            run_dir: self.run_dir.clone(),
            events: summarize_log(&paths.event_log)?,
            network: summarize_log(&paths.network_log)?,
            frames: FrameInventory::scan(&paths.frames_dir)?,
            video: video.is_file().then_some(video),
        };

        if ctx.is_json() {
            ctx.print_json(&summary)
        } else {
            print_text(&summary);
            Ok(())
        }
    }
}

/// Count records in an NDJSON log. A missing log is empty.
fn summarize_log(path: &Path) -> Result<LogSummary, CliError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LogSummary::default()),
        Err(e) => return Err(CliError::io("failed to read log", e, path)),
    };

    let mut summary = LogSummary::default();
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(record)) => {
                summary.records += 1;
                let kind = record
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("unknown");
                *summary.by_type.entry(kind.to_string()).or_default() += 1;
            }
            _ => summary.malformed += 1,
        }
    }
    Ok(summary)
}

fn print_text(summary: &RunSummary) {
    println!("run: {}", summary.run_dir.display());

    println!("events: {}", summary.events.records);
    for (kind, count) in &summary.events.by_type {
        println!("  {kind}: {count}");
    }
    if summary.events.malformed > 0 {
        println!("  malformed lines: {}", summary.events.malformed);
    }

    println!("network: {}", summary.network.records);

    let frames = &summary.frames;
    match (frames.first, frames.last) {
        (Some(first), Some(last)) => println!("frames: {} ({first}..={last})", frames.count),
        _ => println!("frames: 0"),
    }
    if !frames.gaps.is_empty() {
        println!(
            "  gaps: {} missing, encoder reads {} frames",
            frames.gaps.len(),
            frames.encodable()
        );
    }

    match &summary.video {
        Some(video) => println!("video: {}", video.display()),
        None => println!("video: none"),
    }
}
