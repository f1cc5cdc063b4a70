//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{EmbeddingRequest, EmbeddingResponse, HealthResponse, ServiceInfoResponse};
use crate::error::ErrorResponse;
use crate::handlers::{embedding, health, root};

/// OpenAPI documentation for the embedding service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sous Embedding Service",
        description = "Embeds text with the same model used to index the recipe store.

Documents were indexed with a `passage: ` prefix; queries should be sent with
a `query: ` prefix.

## Quick Start

1. Check the model: `GET /health`
2. Embed a query: `POST /embedding` with `{\"text\": \"query: vegan lasagna\"}`
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        root::service_info,
        embedding::embed,
        health::health_check,
    ),
    components(
        schemas(
            // Request types
            EmbeddingRequest,
            // Response types
            ServiceInfoResponse,
            EmbeddingResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "Service descriptor and health"),
        (name = "embedding", description = "Text embedding"),
    )
)]
pub struct ApiDoc;
