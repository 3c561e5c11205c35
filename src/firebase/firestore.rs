// src/firebase/firestore.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{FirebaseError, MetadataStore, NewIssue};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

const ISSUES_COLLECTION: &str = "issues";

/// Cloud Firestore client over the v1 REST surface, scoped to the project's
/// default database.
#[derive(Clone)]
pub struct Firestore {
    client: Client,
    base_url: String,
    project_id: String,
}

impl Firestore {
    pub fn new(project_id: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), project_id)
    }

    /// Point the client at a different host, used to stand up mock servers in
    /// tests.
    pub fn with_base_url(base_url: String, project_id: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            project_id,
        }
    }
}

#[async_trait]
impl MetadataStore for Firestore {
    async fn add_issue(&self, issue: &NewIssue) -> Result<String, FirebaseError> {
        let url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, ISSUES_COLLECTION
        );

        // Firestore's REST representation wraps every field in a typed value.
        let document = json!({
            "fields": {
                "imageUrl": { "stringValue": issue.image_url },
                "description": { "stringValue": issue.description },
                "timestamp": { "timestampValue": issue.timestamp.to_rfc3339() },
                "status": { "stringValue": issue.status },
                "createdAt": { "timestampValue": issue.created_at.to_rfc3339() },
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&document)
            .send()
            .await
            .map_err(|e| FirebaseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FirebaseError::Server {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let created: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FirebaseError::MalformedResponse(e.to_string()))?;

        // The created document's `name` is a full resource path; the generated
        // id is its last segment.
        created["name"]
            .as_str()
            .and_then(|name| name.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .ok_or_else(|| {
                FirebaseError::MalformedResponse("document response missing name".to_string())
            })
    }
}
