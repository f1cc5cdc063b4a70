//! Router configuration and route composition.

use axum::{
    Router,
    routing::{get, post},
};
use sous_core::traits::EmbeddingProvider;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{embedding, health, root};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
pub fn create_router<E: EmbeddingProvider + 'static>(state: AppState<E>) -> Router {
    Router::new()
        .route("/", get(root::service_info::<E>))
        .route("/embedding", post(embedding::embed::<E>))
        .route("/health", get(health::health_check::<E>))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        // Middleware layers (order matters: bottom layers run first)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
