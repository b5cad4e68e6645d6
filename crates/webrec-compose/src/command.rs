//! Encoder argument construction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use webrec_common_config::EncoderConfig;
use webrec_record_types::FRAME_PATTERN;

/// Scale filter rounding both dimensions down to even numbers.
pub const EVEN_DIMENSIONS_FILTER: &str = "scale=trunc(iw/2)*2:trunc(ih/2)*2";

/// Builds the argument list for one encoder run.
#[derive(Debug, Clone)]
pub struct EncoderCommandBuilder {
    framerate: u32,
    input_pattern: PathBuf,
    start_number: Option<u64>,
    codec: String,
    pixel_format: String,
    preset: String,
    output_path: PathBuf,
    overwrite: bool,
}

impl EncoderCommandBuilder {
    /// Encode `<frames_dir>/%05d.png` into `output_path` with the default profile.
    pub fn new(frames_dir: impl AsRef<Path>, output_path: impl Into<PathBuf>) -> Self {
        Self::from_config(&EncoderConfig::default(), frames_dir, output_path)
    }

    pub fn from_config(
        config: &EncoderConfig,
        frames_dir: impl AsRef<Path>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            framerate: config.framerate,
            input_pattern: frames_dir.as_ref().join(FRAME_PATTERN),
            start_number: None,
            codec: config.codec.clone(),
            pixel_format: config.pixel_format.clone(),
            preset: config.preset.clone(),
            output_path: output_path.into(),
            overwrite: false,
        }
    }

    /// First frame index, when the sequence does not start at zero.
    pub fn with_start_number(mut self, start_number: Option<u64>) -> Self {
        self.start_number = start_number.filter(|n| *n > 0);
        self
    }

    /// Replace an existing output file instead of failing.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn build(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        if self.overwrite {
            args.push("-y".into());
        }
        args.push("-framerate".into());
        args.push(self.framerate.to_string().into());
        if let Some(start) = self.start_number {
            args.push("-start_number".into());
            args.push(start.to_string().into());
        }
        args.push("-i".into());
        args.push(self.input_pattern.clone().into_os_string());
        args.extend(
            [
                "-vf",
                EVEN_DIMENSIONS_FILTER,
                "-c:v",
                self.codec.as_str(),
                "-pix_fmt",
                self.pixel_format.as_str(),
                "-preset",
                self.preset.as_str(),
            ]
            .map(OsString::from),
        );
        args.push(self.output_path.clone().into_os_string());
        args
    }
}
