//! Sous Client - HTTP clients for embedding backends
//!
//! This crate provides embedding providers for:
//!
//! - [`openai`] - OpenAI-compatible `/v1/embeddings` endpoints
//! - [`service`] - the Sous embedding service (`sous-embed`)
//!
//! # Overview
//!
//! The clients handle request building, response parsing and error mapping.
//! [`EmbeddingProviderEnum`] selects one of them at runtime.

mod http;
pub mod openai;
pub mod provider;
pub mod service;

// Re-export main client types
pub use openai::OpenAIClient;
pub use provider::{EmbeddingBackend, EmbeddingConfig, EmbeddingProviderEnum};
pub use service::{EmbeddingServiceClient, ServiceHealth};
