//! Embedding endpoint.

use std::time::Instant;

use axum::{Json, extract::State};
use sous_core::traits::EmbeddingProvider;
use tracing::{error, info};

use crate::dto::{EmbeddingRequest, EmbeddingResponse, round_seconds};
use crate::error::ApiError;
use crate::state::AppState;

/// Generate an embedding for the given text.
///
/// The text is embedded as-is; callers add any model-specific prefix.
#[utoipa::path(
    post,
    path = "/embedding",
    request_body = EmbeddingRequest,
    responses(
        (status = 200, description = "Embedding generated", body = EmbeddingResponse),
        (status = 422, description = "Malformed request body"),
        (status = 503, description = "Model not responding", body = crate::error::ErrorResponse),
    ),
    tag = "embedding"
)]
pub async fn embed<E: EmbeddingProvider>(
    State(state): State<AppState<E>>,
    Json(input): Json<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, ApiError> {
    let start = Instant::now();
    let embedding = state.embedding.generate(&input.text).await.map_err(|e| {
        error!(error = %e, "Embedding generation failed");
        ApiError::from(e)
    })?;
    let seconds = start.elapsed().as_secs_f64();

    info!(seconds, "Embedding successfully generated");

    Ok(Json(EmbeddingResponse {
        embedding,
        processing_time: round_seconds(seconds),
    }))
}
