use crate::ComposeError;
use serde::Serialize;
use std::io;
use std::path::Path;
use webrec_common_core::Error;
use webrec_record_types::{parse_frame_index, FRAME_EXTENSION};

/// What a frames directory holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameInventory {
    /// Number of frame files.
    pub count: usize,
    /// Lowest index present.
    pub first: Option<u64>,
    /// Highest index present.
    pub last: Option<u64>,
    /// Indices missing between `first` and `last`.
    pub gaps: Vec<u64>,
}

impl FrameInventory {
    /// Scan `frames_dir`. A missing directory is an empty inventory.
    pub fn scan(frames_dir: impl AsRef<Path>) -> Result<Self, ComposeError> {
        let frames_dir = frames_dir.as_ref();
        let files = match webrec_common_fs::list_files_with_extension(frames_dir, FRAME_EXTENSION) {
            Ok(files) => files,
            Err(Error::FileSystem { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default())
            }
            Err(e) => return Err(e.into()),
        };

        let mut indices: Vec<u64> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(parse_frame_index)
            .collect();
        indices.sort_unstable();
        Ok(Self::from_indices(&indices))
    }

    fn from_indices(sorted: &[u64]) -> Self {
        let mut gaps = Vec::new();
        for pair in sorted.windows(2) {
            gaps.extend(pair[0] + 1..pair[1]);
        }
        Self {
            count: sorted.len(),
            first: sorted.first().copied(),
            last: sorted.last().copied(),
            gaps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Frames the encoder reads before stopping at the first missing index.
    pub fn encodable(&self) -> usize {
        match (self.first, self.gaps.first()) {
            (Some(first), Some(gap)) => (gap - first) as usize,
            _ => self.count,
        }
    }
}
