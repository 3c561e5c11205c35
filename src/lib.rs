// src/lib.rs
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod firebase;
pub mod models;
pub mod routes;

pub use config::Config;
use firebase::{BlobStore, FirebaseStorage, Firestore, MetadataStore};

/// Shared handles for the external stores, constructed once at startup and
/// cloned into every request. Tests substitute in-memory doubles here instead
/// of touching process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn BlobStore>,
    pub issues: Arc<dyn MetadataStore>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // The framework bounds the whole body above the 50 MiB per-file cap the
    // decoder enforces; multipart framing and text fields ride in the slack.
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/report-issue", post(routes::report_issue))
        .route("/api/upload-video", post(routes::upload_video))
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(state)
}

pub async fn run_server(port: u16) -> anyhow::Result<()> {
    // Config::from_env loads .env itself.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldreport=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = Arc::new(FirebaseStorage::new(config.storage_bucket.clone()));
    let issues = Arc::new(Firestore::new(config.project_id.clone()));

    let state = AppState {
        config,
        storage,
        issues,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
