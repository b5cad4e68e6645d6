//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the window host assigns to a monitored window.
///
/// Hosts hand out small integers (the content id of the window), so the
/// wrapper is a plain `u32` rather than a UUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u32);

impl WindowId {
    /// Wrap a raw host identifier.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Parse from string (with or without the `win_` prefix).
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let s = s.strip_prefix("win_").unwrap_or(s);
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| IdParseError::InvalidFormat)
    }

    /// Get the raw value.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for WindowId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({})", self.0)
    }
}

impl std::str::FromStr for WindowId {
    type Err = IdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error parsing an ID.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdParseError {
    /// The ID format is invalid.
    #[error("invalid ID format")]
    InvalidFormat,
}
