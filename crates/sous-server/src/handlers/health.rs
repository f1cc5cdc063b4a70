//! Health check endpoint.

use axum::{Json, extract::State};
use sous_core::PROBE_TEXT;
use sous_core::traits::EmbeddingProvider;
use tracing::error;

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint.
///
/// Embeds a probe text. The service is unhealthy when the model does not
/// answer or its dimension differs from the one measured at startup.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Model is responding", body = HealthResponse),
        (status = 503, description = "Model not responding", body = crate::error::ErrorResponse),
    ),
    tag = "system"
)]
pub async fn health_check<E: EmbeddingProvider>(
    State(state): State<AppState<E>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let probe = state.embedding.generate(PROBE_TEXT).await.map_err(|e| {
        error!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable("Service unhealthy: model not responding".to_string())
    })?;

    if probe.is_empty() {
        error!("Health check failed: empty embedding");
        return Err(ApiError::ServiceUnavailable(
            "Service unhealthy: model not responding".to_string(),
        ));
    }

    if probe.len() != state.dimension {
        error!(
            expected = state.dimension,
            actual = probe.len(),
            "Health check failed: embedding dimension changed since startup"
        );
        return Err(ApiError::ServiceUnavailable(format!(
            "Service unhealthy: model returned {} dimensions, expected {}",
            probe.len(),
            state.dimension
        )));
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.model().to_string(),
        model_loaded: true,
        embedding_dimension: probe.len(),
    }))
}
