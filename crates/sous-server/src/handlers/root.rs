//! Service descriptor endpoint.

use axum::{Json, extract::State};
use sous_core::traits::EmbeddingProvider;

use crate::dto::{SERVICE_NAME, ServiceInfoResponse};
use crate::state::AppState;

/// Service information.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service descriptor", body = ServiceInfoResponse),
    ),
    tag = "system"
)]
pub async fn service_info<E: EmbeddingProvider>(
    State(state): State<AppState<E>>,
) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: SERVICE_NAME.to_string(),
        model: state.model().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health_check: "/health".to_string(),
        embed_endpoint: "/embedding".to_string(),
        docs: "/docs".to_string(),
    })
}
