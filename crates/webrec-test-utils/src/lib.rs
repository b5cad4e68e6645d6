//! Test utilities for webrec crates.

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Parses every line of an NDJSON file. Panics on a malformed line.
pub fn read_ndjson(path: impl AsRef<Path>) -> Vec<serde_json::Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    text.lines()
        .enumerate()
        .map(|(n, line)| {
            serde_json::from_str(line).unwrap_or_else(|e| {
                panic!("{}:{} is not JSON ({e}): {line}", path.display(), n + 1)
            })
        })
        .collect()
}

/// Counts regular files in `dir` with the given extension. Missing dir counts as zero.
pub fn count_files(dir: impl AsRef<Path>, extension: &str) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(extension))
        .count()
}

/// Polls `check` every 10ms until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ndjson_file(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("events.ndjson");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_read_ndjson() {
        let dir = temp_dir();
        let path = ndjson_file(&dir, "{\"type\":\"click\",\"x\":1}\n{\"type\":\"scroll\"}\n");
        let lines = read_ndjson(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "click");
        assert_eq!(lines[0]["x"], 1);
    }

    #[test]
    fn test_count_files() {
        let dir = temp_dir();
        std::fs::write(dir.path().join("00000.png"), b"x").unwrap();
        std::fs::write(dir.path().join("00001.png"), b"x").unwrap();
        std::fs::write(dir.path().join("events.ndjson"), b"x").unwrap();
        assert_eq!(count_files(dir.path(), "png"), 2);
        assert_eq!(count_files(dir.path().join("missing"), "png"), 0);
    }

    #[tokio::test]
    async fn test_wait_until_times_out() {
        assert!(!wait_until(Duration::from_millis(30), || false).await);
        assert!(wait_until(Duration::from_millis(30), || true).await);
    }

    #[test]
    fn test_assert_macros() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(assert_ok!(ok), 3);
        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(assert_err!(err), "boom");
    }

    proptest! {
        #[test]
        fn test_ndjson_line_count_matches(n in 0usize..20) {
            let body: String = (0..n).map(|i| format!("{{\"i\":{i}}}\n")).collect();
            let dir = temp_dir();
            let path = ndjson_file(&dir, &body);
            prop_assert_eq!(read_ndjson(&path).len(), n);
        }
    }
}
