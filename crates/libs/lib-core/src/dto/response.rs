//! # Response Envelope
//!
//! ```text
//! { "success": true,  "message": "Workspace created successfully", "data": { ... }, "code": 201 }
//! { "success": false, "message": "Workspace username already exists", "kind": "Conflict", "code": 409 }
//! ```

use serde::{Deserialize, Serialize};

/// Standard envelope for every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error kind (`Validation`, `Unauthorized`, `NotFound`, `Conflict`, `Internal`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub code: u16,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>, code: u16) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            kind: None,
            code,
        }
    }

    pub fn failure(kind: impl Into<String>, message: impl Into<String>, code: u16) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            kind: Some(kind.into()),
            code,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn ack(message: impl Into<String>, code: u16) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            kind: None,
            code,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}
