//! Wire messages exchanged with the host over the extension transport.
//!
//! Field and action names match the JSON the host-side plumbing speaks:
//! `{"action": "addPost", "clickX": ..., "clickY": ...}` in,
//! `{"success": true, "postData": {...}}` out.

use serde::{Deserialize, Serialize};

use super::record::PostRecord;

/// A request delivered by the host messaging transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CaptureRequest {
    /// Capture the post at (or near) the given interaction point.
    /// Coordinates may be absent or invalid; the locator falls back to
    /// its coordinate-free scan.
    #[serde(rename_all = "camelCase")]
    AddPost {
        click_x: Option<f64>,
        click_y: Option<f64>,
    },

    /// Liveness probe, used to detect whether the engine is active in
    /// the current page before sending a real request.
    Ping,
}

/// Diagnostic payload attached to soft failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionDebug {
    pub text_length: usize,
    pub text_preview: String,
    pub image_count: usize,
    pub video_count: usize,
}

/// Response to an `addPost` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ExtractionDebug>,
}

impl CaptureResponse {
    pub fn ok(record: PostRecord) -> Self {
        Self {
            success: true,
            post_data: Some(record),
            error: None,
            debug: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            post_data: None,
            error: Some(message.into()),
            debug: None,
        }
    }

    pub fn failure_with_debug(message: impl Into<String>, debug: ExtractionDebug) -> Self {
        Self {
            success: false,
            post_data: None,
            error: Some(message.into()),
            debug: Some(debug),
        }
    }
}

/// Response to a `ping` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
}

impl PingResponse {
    pub fn ready() -> Self {
        Self {
            status: "ready".to_string(),
        }
    }
}

/// Any reply the service can send back over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ping(PingResponse),
    Capture(Box<CaptureResponse>),
}
