// src/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportIssueResponse {
    pub success: bool,
    #[serde(rename = "issueId")]
    pub issue_id: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadVideoResponse {
    pub success: bool,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

/// Error body for the issue-report path. `details` is only populated for
/// internal failures; validation errors carry the `error` field alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn validation(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
