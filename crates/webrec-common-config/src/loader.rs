//! Configuration file loading and parsing.

use crate::env::apply_overrides;
use crate::types::WebrecConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the configuration, relative to the project directory.
pub const CONFIG_DIR: &str = ".webrec";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error(
        "invalid YAML at line {}: {message}",
        line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string())
    )]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the configuration file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.webrec/config.yaml`.
    ///
    /// A missing file yields defaults; environment overrides apply either way.
    pub fn load(&self) -> Result<WebrecConfig, ConfigError> {
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            self.parse_file(&config_path)?
        } else {
            WebrecConfig::default()
        };

        apply_overrides(&mut config);
        self.validate(&config)?;
        Ok(config)
    }

    /// Load an explicit configuration file, which must exist.
    pub fn load_file(path: impl AsRef<Path>) -> Result<WebrecConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let loader = Self::new(path.parent().unwrap_or_else(|| Path::new(".")));
        let mut config = loader.parse_file(path)?;
        apply_overrides(&mut config);
        loader.validate(&config)?;
        Ok(config)
    }

    fn parse_file(&self, path: &Path) -> Result<WebrecConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let expanded = self.expand_env_vars(&contents)?;

        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
            ConfigError::ParseError {
                line: None,
                message: e.to_string(),
            }
        })?;

        for cap in re.captures_iter(content) {
            let Some(full_match) = cap.get(0).map(|m| m.as_str()) else {
                continue;
            };
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(full_match, &value);
        }

        Ok(result)
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &WebrecConfig) -> Result<(), ConfigError> {
        let recording = &config.recording;
        let checks = [
            (recording.frame_period_ms == 0, "recording.frame_period_ms must be greater than 0"),
            (recording.frame_period_ms > 1000, "recording.frame_period_ms must not exceed 1000"),
            (
                recording.scroll_throttle_ms == 0,
                "recording.scroll_throttle_ms must be greater than 0",
            ),
            (
                recording.input_throttle_ms == 0,
                "recording.input_throttle_ms must be greater than 0",
            ),
            (recording.max_text_len == 0, "recording.max_text_len must be greater than 0"),
            (
                recording.sink_queue_capacity == 0,
                "recording.sink_queue_capacity must be greater than 0",
            ),
            (recording.flush_batch_size == 0, "recording.flush_batch_size must be greater than 0"),
            (
                recording.flush_interval_ms == 0,
                "recording.flush_interval_ms must be greater than 0",
            ),
            (config.encoder.framerate == 0, "encoder.framerate must be greater than 0"),
            (config.encoder.program.trim().is_empty(), "encoder.program must not be empty"),
            (config.encoder.output_file.trim().is_empty(), "encoder.output_file must not be empty"),
        ];

        if let Some((_, message)) = checks.iter().find(|(failed, _)| *failed) {
            return Err(ConfigError::ValidationError {
                message: message.to_string(),
            });
        }

        if let Some(root) = &recording.destination_root {
            if !root.is_absolute() {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "recording.destination_root must be absolute: {}",
                        root.display()
                    ),
                });
            }
        }

        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, config: &WebrecConfig) -> Result<PathBuf, ConfigError> {
        let config_dir = self.base_path.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&config_path, yaml)?;
        Ok(config_path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}
