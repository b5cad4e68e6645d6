//! Doctor command implementation.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use webrec_common_config::{
    Detection, RECOMMENDED_MAX_FRAME_PERIOD_MS, RECOMMENDED_MIN_FRAME_PERIOD_MS,
};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Check encoder availability and configuration
#[derive(Debug, Parser)]
pub struct DoctorCommand {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EncoderStatus {
    program: String,
    available: bool,
    version: Option<String>,
    path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoctorReport {
    encoder: EncoderStatus,
    destination_root: Option<PathBuf>,
    issues: Vec<String>,
    warnings: Vec<String>,
}

impl DoctorCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let config = &ctx.config;
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        let tool = Detection::encoder(&config.encoder.program).await;
        if !tool.available {
            issues.push(format!(
                "encoder `{}` not found; runs keep their frames but no video is written",
                config.encoder.program
            ));
        }

        match &config.recording.destination_root {
            Some(root) if !root.is_dir() => {
                issues.push(format!("destination root {} does not exist", root.display()))
            }
            Some(_) => {}
            None => warnings.push(
                "no destination root configured; one must be selected before recording".to_string(),
            ),
        }

        if !config.recording.frame_period_is_recommended() {
            warnings.push(format!(
                "frame period {}ms is outside the recommended {RECOMMENDED_MIN_FRAME_PERIOD_MS}..={RECOMMENDED_MAX_FRAME_PERIOD_MS}ms",
                config.recording.frame_period_ms
            ));
        }

        let report = DoctorReport {
            encoder: EncoderStatus {
                program: config.encoder.program.clone(),
                available: tool.available,
                version: tool.version,
                path: tool.path,
            },
            destination_root: config.recording.destination_root.clone(),
            issues,
            warnings,
        };

        if ctx.is_json() {
            return ctx.print_json(&report);
        }
        print_text(&report, ctx);
        Ok(())
    }
}

fn print_text(report: &DoctorReport, ctx: &CommandContext) {
    println!("webrec health check");
    println!();

    let encoder = &report.encoder;
    if encoder.available {
        match &encoder.version {
            Some(version) => println!("  ok   encoder {} {version}", encoder.program),
            None => println!("  ok   encoder {}", encoder.program),
        }
    } else {
        println!("  fail encoder {} not found", encoder.program);
    }

    match &ctx.config_path {
        Some(path) => println!("  ok   config {}", path.display()),
        None => println!("  ok   config (project defaults)"),
    }

    if !report.issues.is_empty() {
        println!();
        println!("Issues found:");
        for (i, issue) in report.issues.iter().enumerate() {
            println!("  {}. {}", i + 1, issue);
        }
    }
    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for (i, warning) in report.warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, warning);
        }
    }

    println!();
    let status = if !report.issues.is_empty() {
        "not ready"
    } else if !report.warnings.is_empty() {
        "ready with warnings"
    } else {
        "ready"
    };
    println!("Overall: {status}");
}
