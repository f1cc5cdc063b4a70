//! Response DTOs for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Recipe Embedding Service";

/// Static service descriptor.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    pub service: String,
    /// Model identifier
    pub model: String,
    /// Service version
    pub version: String,
    /// Path of the health endpoint
    pub health_check: String,
    /// Path of the embedding endpoint
    pub embed_endpoint: String,
    /// Path of the interactive API docs
    pub docs: String,
}

/// Embedding response.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmbeddingResponse {
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Model time in seconds, rounded to two decimals
    pub processing_time: f64,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" when returned with 200
    pub status: String,
    pub model: String,
    pub model_loaded: bool,
    /// Length of the probe embedding
    pub embedding_dimension: usize,
}

/// Rounds seconds to two decimals.
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
