// tests/firebase_client_tests.rs

use chrono::{TimeZone, Utc};
use fieldreport::firebase::{
    BlobStore, FirebaseError, Firestore, FirebaseStorage, MetadataStore, NewIssue,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

#[tokio::test]
async fn put_uploads_media_with_declared_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/b/bucket/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "issues/1-abc123.jpg"))
        .and(header("Content-Type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "issues/1-abc123.jpg",
            "bucket": "bucket"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = FirebaseStorage::with_base_url(server.uri(), "bucket".to_string());
    storage
        .put("issues/1-abc123.jpg", b"0123456789".to_vec(), "image/jpeg")
        .await
        .unwrap();
}

#[tokio::test]
async fn download_url_carries_the_first_token() {
    let server = MockServer::start().await;

    // The object key is a single percent-encoded path segment.
    Mock::given(method("GET"))
        .and(path("/v0/b/bucket/o/issues%2F1-abc123.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "issues/1-abc123.jpg",
            "downloadTokens": "tok-1,tok-2"
        })))
        .mount(&server)
        .await;

    let storage = FirebaseStorage::with_base_url(server.uri(), "bucket".to_string());
    let url = storage.download_url("issues/1-abc123.jpg").await.unwrap();

    assert_eq!(
        url,
        format!(
            "{}/v0/b/bucket/o/issues%2F1-abc123.jpg?alt=media&token=tok-1",
            server.uri()
        )
    );
}

#[tokio::test]
async fn storage_failure_maps_to_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let storage = FirebaseStorage::with_base_url(server.uri(), "bucket".to_string());
    let err = storage
        .put("issues/1-abc123.jpg", b"0123456789".to_vec(), "image/jpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, FirebaseError::Server { status: 403, .. }));
}

#[tokio::test]
async fn add_issue_writes_typed_fields_and_returns_the_document_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/projects/proj/databases/(default)/documents/issues"))
        .and(body_partial_json(json!({
            "fields": {
                "description": { "stringValue": "pothole" },
                "status": { "stringValue": "pending" },
                "imageUrl": { "stringValue": "https://blobs.test/issues/1-abc123.jpg" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/proj/databases/(default)/documents/issues/AbC123xyz",
            "fields": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let db = Firestore::with_base_url(server.uri(), "proj".to_string());
    let issue = NewIssue::pending(
        "https://blobs.test/issues/1-abc123.jpg".to_string(),
        "pothole".to_string(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    );

    let id = db.add_issue(&issue).await.unwrap();
    assert_eq!(id, "AbC123xyz");
}

#[tokio::test]
async fn firestore_failure_maps_to_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let db = Firestore::with_base_url(server.uri(), "proj".to_string());
    let issue = NewIssue::pending(
        "https://blobs.test/x".to_string(),
        "pothole".to_string(),
        Utc::now(),
    );

    let err = db.add_issue(&issue).await.unwrap_err();
    assert!(matches!(err, FirebaseError::Server { status: 500, .. }));
}
