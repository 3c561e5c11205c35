// src/routes/upload.rs
use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    AppState,
    firebase::{FirebaseError, NewIssue},
    models::{ErrorResponse, ReportIssueResponse, UploadVideoResponse},
};

/// Per-file ceiling enforced at decode time, before any storage call.
pub const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/png",
    "video/mp4",
    "video/mpeg",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/mkv",
];

const FILE_FIELD: &str = "file";

pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

struct DecodedRequest {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("Failed to parse multipart form: {0}")]
    Multipart(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),
    #[error("File exceeds the 50 MiB limit")]
    TooLarge,
}

/// Buffers the single `file` part in memory and collects the remaining text
/// fields. MIME and size violations are rejected here so a disallowed upload
/// never reaches the handler logic or the stores.
async fn decode_request(mut multipart: Multipart) -> Result<DecodedRequest, DecodeError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DecodeError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                return Err(DecodeError::UnsupportedMediaType(content_type));
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| DecodeError::Multipart(e.to_string()))?;
            if bytes.len() > MAX_FILE_BYTES {
                return Err(DecodeError::TooLarge);
            }

            file = Some(UploadedFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| DecodeError::Multipart(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok(DecodedRequest { file, fields })
}

// POST /api/report-issue
pub async fn report_issue(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportIssueResponse>, (StatusCode, Json<ErrorResponse>)> {
    let decoded = decode_request(multipart).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(e.to_string())),
        )
    })?;

    let Some(file) = decoded.file else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation("No image file provided")),
        ));
    };

    let description = decoded.fields.get("description").cloned().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation("Missing description field")),
        )
    })?;

    let timestamp = decoded
        .fields
        .get("timestamp")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(
                    "Missing or invalid timestamp field",
                )),
            )
        })?;

    let internal = |e: FirebaseError| {
        tracing::error!("Error handling issue submission: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("Failed to submit issue", e.to_string())),
        )
    };

    let key = issue_key();
    let content_type = file.content_type.clone();

    // Strictly sequential: the blob must exist before its URL can be read,
    // and the record references that URL. A metadata failure after a
    // successful put leaves the blob orphaned; there is no compensating
    // delete.
    state
        .storage
        .put(&key, file.bytes, &content_type)
        .await
        .map_err(internal)?;
    let image_url = state.storage.download_url(&key).await.map_err(internal)?;

    let issue = NewIssue::pending(image_url.clone(), description, timestamp);
    let issue_id = state.issues.add_issue(&issue).await.map_err(internal)?;

    tracing::info!("Recorded issue {} at {}", issue_id, key);

    Ok(Json(ReportIssueResponse {
        success: true,
        issue_id,
        image_url,
    }))
}

// POST /api/upload-video
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadVideoResponse>, (StatusCode, String)> {
    let decoded = decode_request(multipart)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let Some(file) = decoded.file else {
        return Err((StatusCode::BAD_REQUEST, "No file uploaded".to_string()));
    };

    // This path hides failure details from the caller; they go to the log
    // only.
    let internal = |e: FirebaseError| {
        tracing::error!("Error uploading video: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    let key = video_key(file.file_name.as_deref().unwrap_or("upload"));
    let content_type = file.content_type.clone();

    state
        .storage
        .put(&key, file.bytes, &content_type)
        .await
        .map_err(internal)?;
    let video_url = state.storage.download_url(&key).await.map_err(internal)?;

    tracing::info!("Stored video at {}", key);

    Ok(Json(UploadVideoResponse {
        success: true,
        video_url,
    }))
}

/// Key for an issue image. The `.jpg` suffix is fixed regardless of the
/// uploaded file's actual MIME type, matching the deployed behavior this
/// service replaces; clients resolve the content type from the blob's
/// metadata, not the key.
fn issue_key() -> String {
    format!(
        "issues/{}-{}.jpg",
        Utc::now().timestamp_millis(),
        base36_suffix(6)
    )
}

fn video_key(original_name: &str) -> String {
    format!("videos/{}_{}", Utc::now().timestamp_millis(), original_name)
}

fn base36_suffix(len: usize) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| DIGITS[rng.random_range(0..DIGITS.len())] as char)
        .collect()
}
