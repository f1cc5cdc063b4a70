//! Client for the Sous embedding service (`sous-embed`).
//!
//! The service answers `POST /embedding` with `{"text": ..}` and returns
//! `{"embedding": [..], "processing_time": ..}`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sous_core::error::AppError;
use sous_core::{DEFAULT_EMBEDDING_MODEL, HttpConfig};
use tracing::debug;

use crate::http::{build_client, map_send_error, map_status_error};

/// Default base URL of a local embedding service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

const BACKEND: &str = "embedding service";

/// HTTP client for the embedding service.
#[derive(Clone)]
pub struct EmbeddingServiceClient {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
    #[serde(default)]
    processing_time: Option<f64>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub model: String,
    pub model_loaded: bool,
    pub embedding_dimension: usize,
}

impl EmbeddingServiceClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_config(base_url, DEFAULT_EMBEDDING_MODEL, &HttpConfig::default())
    }

    /// Creates a client with an explicit model label and timeout.
    ///
    /// The model label is only used for logging; the service decides which
    /// model it runs.
    pub fn with_config(base_url: &str, model: &str, http: &HttpConfig) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AppError::ConfigError(
                "embedding service URL is empty".to_string(),
            ));
        }

        Ok(Self {
            client: build_client(http)?,
            base_url: base_url.to_string(),
            model: model.to_string(),
            timeout_secs: http.timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Embeds a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let response = self
            .client
            .post(self.url("/embedding"))
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| map_send_error(e, BACKEND, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &body, BACKEND));
        }

        let body: EmbedResponse = response.json().await.map_err(|e| {
            AppError::ClientError(format!("Failed to parse embedding service response: {}", e))
        })?;

        if body.embedding.is_empty() {
            return Err(AppError::EmptyResponse);
        }
        if let Some(seconds) = body.processing_time {
            debug!(seconds, "Embedding service processing time");
        }
        Ok(body.embedding)
    }

    /// Queries `GET /health`.
    pub async fn health(&self) -> Result<ServiceHealth, AppError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| map_send_error(e, BACKEND, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &body, BACKEND));
        }

        response.json().await.map_err(|e| {
            AppError::ClientError(format!("Failed to parse health response: {}", e))
        })
    }
}

impl sous_core::traits::EmbeddingProvider for EmbeddingServiceClient {
    fn name(&self) -> &'static str {
        "service"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, text: &str) -> Result<Vec<f32>, AppError> {
        self.embed(text).await
    }
}
