//! Request and response shapes exchanged with the control surface.
//!
//! Field names follow the camelCase convention of the IPC layer.

use crate::RecorderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use webrec_common_core::WindowId;

/// Result of `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_directory: Option<PathBuf>,
}

impl StartResponse {
    pub fn started(run_directory: PathBuf) -> Self {
        Self {
            success: true,
            message: format!("recording started, output dir: {}", run_directory.display()),
            run_directory: Some(run_directory),
        }
    }

    pub fn already_recording(run_directory: PathBuf) -> Self {
        Self {
            success: true,
            message: "already recording".to_string(),
            run_directory: Some(run_directory),
        }
    }

    pub fn failed(error: &RecorderError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            run_directory: None,
        }
    }
}

/// Result of `stop`. Stopping always succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResponse {
    pub success: bool,
    pub message: String,
}

impl StopResponse {
    pub fn stopped() -> Self {
        Self {
            success: true,
            message: "recording stopped".to_string(),
        }
    }
}

/// One live window in a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStatus {
    pub window_id: WindowId,
    pub current_url: Option<String>,
    pub recording: bool,
}

/// Result of `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub root: Option<PathBuf>,
    pub sessions: Vec<WindowStatus>,
}

/// What the folder picker returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderSelection {
    Selected(PathBuf),
    Canceled,
}

/// Result of `select-folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFolderResponse {
    pub canceled: bool,
    pub path: Option<PathBuf>,
}

/// Result of `open-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenUrlResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OpenUrlResponse {
    pub fn opened(window_id: WindowId) -> Self {
        Self {
            success: true,
            window_id: Some(window_id),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            window_id: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_response_json() {
        let response = StartResponse::started(PathBuf::from("/tmp/rec/record-7-x"));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "message": "recording started, output dir: /tmp/rec/record-7-x",
                "runDirectory": "/tmp/rec/record-7-x"
            })
        );

        let failed = StartResponse::failed(&RecorderError::Configuration);
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"success": false, "message": "select folder first"})
        );
    }

    #[test]
    fn test_status_json() {
        let status = StatusResponse {
            root: None,
            sessions: vec![WindowStatus {
                window_id: WindowId::new(2),
                current_url: Some("https://a.test/".into()),
                recording: true,
            }],
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({
                "root": null,
                "sessions": [{"windowId": 2, "currentUrl": "https://a.test/", "recording": true}]
            })
        );
    }

    #[test]
    fn test_open_url_json() {
        assert_eq!(
            serde_json::to_value(OpenUrlResponse::opened(WindowId::new(5))).unwrap(),
            json!({"success": true, "windowId": 5})
        );
        assert_eq!(
            serde_json::to_value(OpenUrlResponse::failed("invalid URL")).unwrap(),
            json!({"success": false, "message": "invalid URL"})
        );
    }
}
