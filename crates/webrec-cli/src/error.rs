//! CLI error handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use webrec_common_config::ConfigError;
use webrec_compose::ComposeError;

use crate::Exit;

/// CLI error type with context for the operator
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<ConfigError>,
        hint: Option<String>,
    },

    #[error("{message}: {}", path.display())]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: PathBuf,
    },

    #[error("{message}")]
    Validation {
        message: String,
        hint: Option<String>,
    },

    #[error("video composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Exit code for this error
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::Compose(_) | Self::Other(_) => Exit::GeneralError,
        }
    }

    /// Hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Validation { hint, .. } => hint.as_deref(),
            Self::Compose(ComposeError::Spawn { .. }) => {
                Some("check `encoder.program` or run `webrec doctor`")
            }
            _ => None,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a validation error with hint
    pub fn validation_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an IO error with path
    pub fn io(message: impl Into<String>, source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: path.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        let hint = match &e {
            ConfigError::NotFound { .. } => {
                Some("create one with `webrec config init`".to_string())
            }
            ConfigError::EnvVarNotFound { var } => Some(format!("set {var} or give it a default")),
            _ => None,
        };
        Self::Config {
            message: e.to_string(),
            source: Some(e),
            hint,
        }
    }
}

impl From<webrec_common_core::Error> for CliError {
    fn from(e: webrec_common_core::Error) -> Self {
        match e {
            webrec_common_core::Error::FileSystem {
                message,
                path,
                source,
            } => Self::Io {
                message,
                source,
                path,
            },
            other => Self::Other(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert!(matches!(
            CliError::from(ConfigError::ValidationError {
                message: "bad".into()
            })
            .exit(),
            Exit::ConfigError
        ));
        assert!(matches!(
            CliError::validation("not a run directory").exit(),
            Exit::ValidationError
        ));
        assert!(matches!(
            CliError::io("read failed", io::Error::from(io::ErrorKind::Other), "/x").exit(),
            Exit::IoError
        ));
        assert!(matches!(
            CliError::Other(anyhow::anyhow!("boom")).exit(),
            Exit::GeneralError
        ));
    }

    #[test]
    fn test_config_not_found_hint() {
        let err = CliError::from(ConfigError::NotFound {
            path: PathBuf::from("/nope.yaml"),
        });
        assert_eq!(err.hint(), Some("create one with `webrec config init`"));
        assert!(err.to_string().contains("/nope.yaml"));
    }
}
