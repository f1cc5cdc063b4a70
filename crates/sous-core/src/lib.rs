//! Sous Core - Domain types, record decoding, and the import pipeline.
//!
//! This crate provides the core functionality for Sous, including:
//!
//! - **Literal parsing**: a safe parser for the `c("a", "b")` vector literals
//!   found in recipe CSV exports
//! - **Decoding**: prefix-dispatched field decoders for list-valued columns
//! - **Transformation**: metadata and embeddable content built from a raw row
//! - **Services**: [`ImportService`] for streaming CSV files into a vector store
//! - **Traits**: [`EmbeddingProvider`], [`RecipeStore`] for dependency injection
//! - **Progress reporting**: [`ProgressReporter`] trait for decoupled logging
//!
//! # Architecture
//!
//! Business logic is decoupled from I/O through traits:
//!
//! - [`EmbeddingProvider`] - abstracts embedding generation (an HTTP model backend)
//! - [`RecipeStore`] - abstracts database writes (PostgreSQL with pgvector)
//!
//! # Example
//!
//! ```ignore
//! use sous_core::{ImportConfig, ImportService, TracingReporter};
//!
//! let service = ImportService::with_config(store, embedding, ImportConfig::default());
//! let stats = service
//!     .import_path_with_progress("recipes.csv", &TracingReporter)
//!     .await?;
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod import;
pub mod literal;
pub mod models;
pub mod progress;
pub mod stats;
pub mod traits;
pub mod transform;

// Configuration
pub use config::{
    DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_MODEL, DEFAULT_FIELD_SIZE_LIMIT, DbSettings,
    HttpConfig, ImportConfig, PASSAGE_PREFIX, PROBE_TEXT,
};

// Error handling
pub use error::{AppError, RecordError};

// Parsing and decoding
pub use decoder::{
    Rule, decode_field, decode_images, decode_ingredients, decode_instructions, decode_keywords,
};
pub use literal::{Literal, LiteralError, parse_literal, parse_vector_literal};

// Domain models
pub use models::{DatabaseStats, NewRecipe, RawRecord, RecipeMetadata};

// Statistics and progress reporting
pub use progress::{ImportEvent, ProgressReporter, SilentReporter, SkipReason, TracingReporter};
pub use stats::{ImportStats, RecordOutcome};

// Traits for dependency injection
pub use traits::{EmbeddingProvider, RecipeStore};

// Services
pub use import::{ImportService, count_records, probe_dimension};
pub use transform::{build_content, build_metadata};
