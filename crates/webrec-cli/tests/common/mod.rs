//! Common test utilities for CLI testing.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with a temporary project directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a config file and return its path
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.path().join("webrec.yaml");
        std::fs::write(&path, yaml).expect("Failed to write config");
        path
    }

    /// Create `record-1-x` with the given frame indices and log lines
    pub fn run_dir(&self, frames: &[u64], events: &[&str], network: &[&str]) -> PathBuf {
        let run = self.path().join("record-1-2024-01-01_00-00-00");
        std::fs::create_dir_all(run.join("frames")).expect("Failed to create run dir");
        for i in frames {
            std::fs::write(run.join(format!("frames/{i:05}.png")), b"png").unwrap();
        }
        write_lines(&run.join("events.ndjson"), events);
        write_lines(&run.join("network.ndjson"), network);
        run
    }

    /// A command isolated from the caller's environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("webrec").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("WEBREC_CONFIG")
            .env_remove("WEBREC_FFMPEG")
            .env_remove("WEBREC_DESTINATION_ROOT")
            .env_remove("WEBREC_LOG_FILE")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn write_lines(path: &Path, lines: &[&str]) {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(path, contents).unwrap();
}

/// Executable shell script in `dir`
#[cfg(unix)]
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
