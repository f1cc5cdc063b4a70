use sous_core::traits::EmbeddingProvider;

/// Shared application state for all handlers.
///
/// Cloned per request by Axum; the provider holds its HTTP client behind an `Arc`.
#[derive(Clone)]
pub struct AppState<E: EmbeddingProvider> {
    /// The loaded embedding model
    pub embedding: E,

    /// Embedding dimension measured at startup
    pub dimension: usize,
}

impl<E: EmbeddingProvider> AppState<E> {
    pub fn new(embedding: E, dimension: usize) -> Self {
        Self {
            embedding,
            dimension,
        }
    }

    /// Model identifier reported to clients.
    pub fn model(&self) -> &str {
        self.embedding.model()
    }
}
