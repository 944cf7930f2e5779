//! Environment-driven server configuration.

use anyhow::Context;
use ragserve_core::RagConfig;

/// Deployment environment; controls whether error responses carry
/// underlying failure details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Error responses include a `details` field.
    Development,
    /// Error responses carry only the generic message.
    Production,
}

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host, `RAGSERVE_HOST` (default `127.0.0.1`).
    pub host: String,
    /// Bind port, `RAGSERVE_PORT` (default 5000).
    pub port: u16,
    /// OpenAI API key, `OPENAI_API_KEY` (required).
    pub openai_api_key: String,
    /// Qdrant gRPC endpoint, `QDRANT_URL` (default `http://localhost:6334`).
    pub qdrant_url: String,
    /// WebDriver endpoint for URL extraction, `WEBDRIVER_URL`
    /// (default `http://localhost:9515`).
    pub webdriver_url: String,
    /// Deployment environment, `RAGSERVE_ENV` (default `development`).
    pub environment: Environment,
    /// Chunking and retrieval parameters.
    pub rag: RagConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `OPENAI_API_KEY` is unset or `RAGSERVE_PORT` is not a
    /// valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("RAGSERVE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match std::env::var("RAGSERVE_PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("invalid RAGSERVE_PORT '{raw}'"))?,
            Err(_) => 5000,
        };
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let qdrant_url =
            std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".to_string());
        let webdriver_url = std::env::var("WEBDRIVER_URL")
            .unwrap_or_else(|_| "http://localhost:9515".to_string());
        let environment = match std::env::var("RAGSERVE_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            host,
            port,
            openai_api_key,
            qdrant_url,
            webdriver_url,
            environment,
            rag: RagConfig::default(),
        })
    }
}
