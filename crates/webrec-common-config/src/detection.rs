//! Tool and environment detection.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// How long a version probe may run before the tool counts as unavailable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tool detection results.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
    pub available: bool,
}

/// Environment detection utilities.
pub struct Detection;

impl Detection {
    /// Probe the configured encoder with `-version`.
    pub async fn encoder(program: &str) -> ToolInfo {
        Self::detect_with_version_arg(program, &["-version"]).await
    }

    async fn detect_with_version_arg(command: &str, args: &[&str]) -> ToolInfo {
        let candidate = PathBuf::from(command);
        let mut tool_info = ToolInfo {
            name: command.to_string(),
            version: None,
            path: candidate.is_absolute().then_some(candidate),
            available: false,
        };

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if let Ok(Ok(output)) = tokio::time::timeout(PROBE_TIMEOUT, cmd.output()).await {
            if output.status.success() {
                tool_info.available = true;
                let output_str = String::from_utf8_lossy(&output.stdout);
                tool_info.version = Self::extract_version(&output_str);
            }
        }

        tool_info
    }

    fn extract_version(output: &str) -> Option<String> {
        for line in output.lines() {
            let line = line.trim();

            // "ffmpeg version 6.1.1-3ubuntu5 Copyright ..." or "tool 1.2.3"
            for word in line.split_whitespace() {
                if Self::looks_like_version(word) {
                    return Some(word.to_string());
                }
            }
        }

        None
    }

    fn looks_like_version(s: &str) -> bool {
        let Some(first) = s.chars().next() else {
            return false;
        };

        if !first.is_ascii_digit() || !s.contains('.') {
            return false;
        }

        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_ascii_alphabetic());

        valid_chars && s.len() >= 3
    }
}
