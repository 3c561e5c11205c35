use anyhow::{Context, Result};
use serde::Deserialize;

/// Connection settings for the Firebase project backing the service.
///
/// All six project identifiers are required; the external SDK surface has no
/// defined behavior without them, so absence is a startup failure rather than
/// a runtime error kind.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            api_key: require("API_KEY")?,
            auth_domain: require("AUTH_DOMAIN")?,
            project_id: require("PROJECT_ID")?,
            storage_bucket: require("STORAGE_BUCKET")?,
            messaging_sender_id: require("MESSAGING_SENDER_ID")?,
            app_id: require("APP_ID")?,
        };

        Ok(config)
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} must be set", name))
}
