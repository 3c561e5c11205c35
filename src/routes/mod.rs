// src/routes/mod.rs
use axum::response::Json;
use serde_json::json;

pub mod upload;

pub use upload::{report_issue, upload_video};

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "fieldreport",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
