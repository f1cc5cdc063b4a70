//! Sous Server - HTTP embedding service
//!
//! This crate exposes the embedding model over HTTP so query-side
//! components embed text the same way the importer did:
//!
//! - **Descriptor**: `GET /` returns the service name, model and endpoints
//! - **Embedding**: `POST /embedding` embeds a single text
//! - **Health**: `GET /health` probes the model with a test input
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/docs`.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
