//! HTTP request handlers for API endpoints.

pub mod embedding;
pub mod health;
pub mod root;
