//! File system utilities for webrec.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use webrec_common_core::{Error, Result};

/// Attempts made before giving up on a unique directory name.
const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

/// Ensure a directory exists, creating missing parents.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)
            .map_err(|e| Error::file_system("failed to create directory", path, e))?;
    }
    Ok(())
}

/// Create a fresh directory named `base` under `parent`.
///
/// If `base` is taken, `base-1`, `base-2`, ... are tried in order. The
/// directory itself is created with `create_dir`, so two callers racing
/// for the same name never end up sharing it.
pub fn create_unique_dir(parent: impl AsRef<Path>, base: &str) -> Result<PathBuf> {
    let parent = parent.as_ref();
    ensure_dir(parent)?;

    for attempt in 0..MAX_UNIQUE_ATTEMPTS {
        let name = if attempt == 0 {
            base.to_string()
        } else {
            format!("{base}-{attempt}")
        };
        let candidate = parent.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(Error::file_system("failed to create directory", candidate, e))
            }
        }
    }

    Err(Error::file_system(
        "no free directory name",
        parent.join(base),
        io::Error::from(io::ErrorKind::AlreadyExists),
    ))
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));
    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    match path.file_name() {
        Some(name) => temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => temp_path.push(".tmp"),
    }

    {
        let mut file = File::create(&temp_path)
            .map_err(|e| Error::file_system("failed to create temporary file", &temp_path, e))?;
        file.write_all(contents)
            .map_err(|e| Error::file_system("failed to write temporary file", &temp_path, e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::file_system("failed to move temporary file into place", path, e)
    })
}

/// Open a file for appending, creating it if needed. Existing content is kept.
pub fn open_append(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::file_system("failed to open file for append", path, e))
}

/// Regular files in `dir` with the given extension, sorted by name.
///
/// Hidden files (including in-flight `.name.tmp` files) are skipped.
pub fn list_files_with_extension(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        fs::read_dir(dir).map_err(|e| Error::file_system("failed to read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::file_system("failed to read directory", dir, e))?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden || !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
