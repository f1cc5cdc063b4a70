//! Sous DB - Database repository layer for PostgreSQL with pgvector
//!
//! This crate provides the repository pattern for recipe persistence
//! with pgvector embeddings.
//!
//! # Overview
//!
//! The main components are:
//! - [`RecipeRepository`] - Batched, transactional recipe inserts
//! - [`RecipeSchema`] - Catalog view of the `recipes` table, used to check
//!   the embedding dimension before importing

mod repository;

pub use repository::{MetadataType, RecipeRepository, RecipeSchema, connect_options};
