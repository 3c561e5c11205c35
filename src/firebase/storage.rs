// src/firebase/storage.rs
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;

use super::{BlobStore, FirebaseError};

pub const DEFAULT_BASE_URL: &str = "https://firebasestorage.googleapis.com";

// Escapes everything but unreserved characters, notably the '/' inside keys.
const KEY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Firebase Storage client over the JSON REST surface.
///
/// Object keys contain `/` (prefix directories) and arbitrary client
/// filenames, and the REST API addresses an object as a single percent-encoded
/// path segment, so keys are always escaped before they reach a URL path.
#[derive(Clone)]
pub struct FirebaseStorage {
    client: Client,
    base_url: String,
    bucket: String,
}

impl FirebaseStorage {
    pub fn new(bucket: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), bucket)
    }

    /// Point the client at a different host, used to stand up mock servers in
    /// tests.
    pub fn with_base_url(base_url: String, bucket: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            bucket,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}",
            self.base_url,
            self.bucket,
            utf8_percent_encode(key, KEY_ESCAPE)
        )
    }
}

#[async_trait]
impl BlobStore for FirebaseStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FirebaseError> {
        let url = format!("{}/v0/b/{}/o", self.base_url, self.bucket);
        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", key)])
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| FirebaseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FirebaseError::Server {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn download_url(&self, key: &str) -> Result<String, FirebaseError> {
        let response = self
            .client
            .get(self.object_url(key))
            .send()
            .await
            .map_err(|e| FirebaseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FirebaseError::Server {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let metadata: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FirebaseError::MalformedResponse(e.to_string()))?;

        // Objects uploaded through the REST surface carry one or more download
        // tokens; any of them makes the URL publicly retrievable.
        let token = metadata["downloadTokens"]
            .as_str()
            .and_then(|tokens| tokens.split(',').next())
            .ok_or_else(|| {
                FirebaseError::MalformedResponse(
                    "object metadata missing downloadTokens".to_string(),
                )
            })?;

        Ok(format!("{}?alt=media&token={}", self.object_url(key), token))
    }
}
