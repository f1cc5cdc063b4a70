//! Request DTOs for API endpoints.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /embedding`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmbeddingRequest {
    /// The text to embed
    #[schema(example = "query: apple pie without eggs")]
    pub text: String,
}
