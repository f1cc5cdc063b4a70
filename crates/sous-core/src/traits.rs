//! Trait definitions for external dependencies.
//!
//! The import pipeline talks to the embedding model and to storage only
//! through these traits. Concrete handles are created at process start and
//! passed in explicitly.
//!
//! # Example
//!
//! ```
//! use sous_core::traits::EmbeddingProvider;
//! use sous_core::AppError;
//!
//! async fn dimension<E: EmbeddingProvider>(embedding: &E) -> Result<usize, AppError> {
//!     Ok(embedding.generate("healthy").await?.len())
//! }
//! ```

use std::future::Future;

use crate::{AppError, NewRecipe};

/// Provider for generating text embeddings.
///
/// Treated as a pure function: the same text always maps to the same vector
/// and calls have no observable side effects.
pub trait EmbeddingProvider: Send + Sync + Clone {
    /// Returns the provider name for logging.
    fn name(&self) -> &'static str;

    /// Returns the model identifier served by this provider.
    fn model(&self) -> &str;

    /// Generates an embedding vector for the given text.
    fn generate(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, AppError>> + Send;
}

/// Append-only store for embedded recipes.
pub trait RecipeStore: Send + Sync + Clone {
    /// Inserts all rows in one transaction and commits it.
    ///
    /// Either every row is stored or none is. Returns the number of rows written.
    fn insert_batch(
        &self,
        recipes: &[NewRecipe],
    ) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// Checks storage connectivity.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}
