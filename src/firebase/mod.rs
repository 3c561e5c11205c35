// src/firebase/mod.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod firestore;
pub mod storage;

pub use firestore::Firestore;
pub use storage::FirebaseStorage;

/// Object store addressed by string keys. Each stored object has a durable
/// public retrieval URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<(), FirebaseError>;

    async fn download_url(&self, key: &str) -> Result<String, FirebaseError>;
}

/// Append-style document store; writes return the server-generated id.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn add_issue(&self, issue: &NewIssue) -> Result<String, FirebaseError>;
}

/// An issue record as written to the `issues` collection. `status` is always
/// `"pending"` at creation; this service never writes any other value and
/// never updates or deletes a record.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub image_url: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl NewIssue {
    pub fn pending(image_url: String, description: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            image_url,
            description,
            timestamp,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned status {status}: {body}")]
    Server { status: u16, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
