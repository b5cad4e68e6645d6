//! Network log records.

use serde::{Deserialize, Serialize};
use webrec_common_core::WindowId;

/// A completed request as reported by the shared network context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCompletion {
    /// Window whose page issued the request.
    pub window_id: WindowId,
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub from_cache: bool,
}

/// One line of `network.ndjson`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "network", rename_all = "camelCase")]
pub struct NetworkRecord {
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub from_cache: bool,
    /// Host receipt time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl NetworkRecord {
    /// Build the record for a completion received at `timestamp`.
    pub fn from_completion(completion: NetworkCompletion, timestamp: i64) -> Self {
        Self {
            method: completion.method,
            url: completion.url,
            status_code: completion.status_code,
            from_cache: completion.from_cache,
            timestamp,
        }
    }
}
