//! OpenAI-compatible embeddings client.
//!
//! Talks to any server implementing `POST /v1/embeddings`: OpenAI itself,
//! or a self-hosted text-embeddings-inference / vLLM instance serving
//! `intfloat/e5-small-v2`.
//!
//! # Examples
//!
//! ```no_run
//! use sous_client::OpenAIClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new("http://localhost:8080/v1/embeddings", "intfloat/e5-small-v2")?;
//! let embedding = client.get_embeddings("passage: Hello, world!").await?;
//! println!("Embedding dimension: {}", embedding.len()); // 384
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sous_core::HttpConfig;
use sous_core::error::AppError;

use crate::http::{build_client, map_send_error, map_status_error};

/// Default endpoint for a local text-embeddings-inference server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/embeddings";

/// HTTP client for OpenAI-compatible embedding APIs.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    timeout_secs: u64,
}

/// Request body for the embedding API
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// Response from the embedding API
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAIClient {
    /// Creates a client for an unauthenticated endpoint.
    pub fn new(endpoint: &str, model: &str) -> Result<Self, AppError> {
        Self::with_config(endpoint, model, None, &HttpConfig::default())
    }

    /// Creates a new client with full configuration.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the embeddings route
    /// * `model` - Model name sent with every request
    /// * `api_key` - Bearer token, if the endpoint requires one
    /// * `http` - Timeout settings
    pub fn with_config(
        endpoint: &str,
        model: &str,
        api_key: Option<&str>,
        http: &HttpConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client(http)?,
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            timeout_secs: http.timeout.as_secs(),
        })
    }

    /// Returns the model being used.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generates text embeddings for a single text.
    pub async fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let embeddings = self.get_embeddings_batch(&[text]).await?;
        embeddings.into_iter().next().ok_or(AppError::EmptyResponse)
    }

    /// Generates text embeddings for multiple texts in a single API call.
    ///
    /// Returns one vector per input text, in input order.
    pub async fn get_embeddings_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
        };

        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_send_error(e, "embedding endpoint", self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(
                status.as_u16(),
                &error_text,
                "embedding endpoint",
            ));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::ClientError(format!("Failed to parse embedding response: {}", e))
        })?;

        let mut data = embedding_response.data;
        if data.len() != texts.len() {
            return Err(AppError::EmptyResponse);
        }
        // Sort by index to ensure correct order
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

// =============================================================================
// Trait Implementation: EmbeddingProvider
// =============================================================================

impl sous_core::traits::EmbeddingProvider for OpenAIClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, text: &str) -> Result<Vec<f32>, AppError> {
        self.get_embeddings(text).await
    }
}
