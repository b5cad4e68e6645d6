//! Configuration types for webrec.
//!
//! This crate provides the configuration used by the recorder, read from
//! `.webrec/config.yaml` files with environment overrides applied on top.

pub mod detection;
pub mod env;
pub mod loader;
pub mod types;


pub use detection::{Detection, ToolInfo};
pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = WebrecConfig::default();

        assert!(config.recording.destination_root.is_none());
        assert_eq!(config.recording.frame_period_ms, 33);
        assert_eq!(config.recording.scroll_throttle_ms, 200);
        assert_eq!(config.recording.input_throttle_ms, 30);
        assert_eq!(config.recording.max_text_len, 100);
        assert_eq!(config.recording.sink_queue_capacity, 256);

        assert_eq!(config.encoder.program, "ffmpeg");
        assert_eq!(config.encoder.framerate, 30);
        assert_eq!(config.encoder.codec, "libx264");
        assert_eq!(config.encoder.pixel_format, "yuv420p");
        assert_eq!(config.encoder.preset, "fast");
        assert_eq!(config.encoder.output_file, "recording.mp4");
    }

    #[test]
    fn test_duration_accessors() {
        let config = RecordingConfig::default();
        assert_eq!(config.frame_period(), Duration::from_millis(33));
        assert_eq!(config.scroll_throttle(), Duration::from_millis(200));
        assert_eq!(config.input_throttle(), Duration::from_millis(30));
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let config = WebrecConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(yaml.contains("recording:"));
        assert!(yaml.contains("encoder:"));
        assert!(yaml.contains("frame_period_ms: 33"));
        assert!(yaml.contains("program: ffmpeg"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
recording:
  frame_period_ms: 50
encoder:
  preset: veryfast
"#;

        let config: WebrecConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert_eq!(config.recording.frame_period_ms, 50);
        assert_eq!(config.encoder.preset, "veryfast");

        assert_eq!(config.recording.scroll_throttle_ms, 200);
        assert_eq!(config.encoder.codec, "libx264");
    }
}
