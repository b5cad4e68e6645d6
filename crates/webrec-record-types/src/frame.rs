//! Frame file naming.

/// Extension of frame files.
pub const FRAME_EXTENSION: &str = "png";

/// Numbered-image pattern understood by the encoder.
pub const FRAME_PATTERN: &str = "%05d.png";

/// File name for frame `index`: zero-padded to five digits.
pub fn frame_file_name(index: u64) -> String {
    format!("{index:05}.{FRAME_EXTENSION}")
}

/// Index encoded in a frame file name, if it is one.
pub fn parse_frame_index(file_name: &str) -> Option<u64> {
    let stem = file_name.strip_suffix(".png")?;
    if stem.len() < 5 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}
