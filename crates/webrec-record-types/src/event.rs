//! Event log records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record type names written to the event log.
pub mod kinds {
    pub const CLICK: &str = "click";
    pub const SCROLL: &str = "scroll";
    pub const INPUT: &str = "input";
    pub const ERROR: &str = "error";
    pub const KEYDOWN: &str = "keydown";
    pub const NAVIGATION: &str = "navigation";
    pub const RECORDING_START: &str = "recording-start";
    pub const RECORDING_STOP: &str = "recording-stop";
}

/// A record as pushed from the monitored context: a type and its fields.
///
/// The sender never supplies the timestamp; a `ts` field in the payload is
/// discarded when the host stamps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePayload {
    /// Record type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RemotePayload {
    /// Create a payload with no fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Add a field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// One line of `events.ndjson`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Record type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Host receipt time, milliseconds since the Unix epoch.
    pub ts: i64,
    /// Type-specific fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Stamp a payload with the host receipt time.
    pub fn stamp(payload: RemotePayload, ts: i64) -> Self {
        let RemotePayload { kind, mut fields } = payload;
        fields.remove("ts");
        fields.remove("type");
        Self { kind, ts, fields }
    }
}
