//! Integration tests for RecipeRepository.
//!
//! These tests verify the repository layer against a real PostgreSQL database
//! with pgvector extension. Each test runs in an isolated container.

use pgvector::Vector;
use sous_core::AppError;
use sous_core::models::NewRecipe;
use sous_db::{MetadataType, RecipeRepository};

use crate::integration::common::{
    JSONB_SCHEMA, TEST_DIMENSION, sample_recipe, sample_recipes, setup_test_db,
    setup_test_db_with, start_postgres,
};

/// A batch is written and committed in one call.
#[tokio::test]
async fn test_insert_batch_writes_all_rows() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool);

    let written = repo
        .insert_batch(&sample_recipes(3))
        .await
        .expect("insert should succeed");

    assert_eq!(written, 3);
    assert_eq!(repo.get_stats().await.unwrap().total_recipes, 3);
}

/// Stored content, metadata and embedding round-trip unchanged.
#[tokio::test]
async fn test_insert_batch_stores_values_verbatim() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool.clone());
    let recipe = sample_recipe("Apple Pie");

    repo.insert_batch(std::slice::from_ref(&recipe))
        .await
        .unwrap();

    let (content, embedding, metadata): (String, Vector, String) =
        sqlx::query_as("SELECT content, embedding, metadata FROM recipes")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(content, recipe.content);
    assert_eq!(metadata, recipe.metadata);
    assert_eq!(embedding.as_slice().len(), TEST_DIMENSION);
    assert_eq!(embedding.as_slice(), recipe.embedding.as_slice());
}

#[tokio::test]
async fn test_insert_empty_batch_is_noop() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool);

    assert_eq!(repo.insert_batch(&[]).await.unwrap(), 0);
    assert_eq!(repo.get_stats().await.unwrap().total_recipes, 0);
}

/// A failing row rolls back the whole batch.
#[tokio::test]
async fn test_insert_batch_is_atomic() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool);

    let mut recipes = sample_recipes(2);
    recipes.push(NewRecipe {
        embedding: Vector::from(vec![0.5; 8]),
        ..sample_recipe("Wrong dimension")
    });

    let result = repo.insert_batch(&recipes).await;

    assert!(matches!(result, Err(AppError::DatabaseError(_))));
    assert_eq!(repo.get_stats().await.unwrap().total_recipes, 0);
}

/// Batches larger than one statement's bind limit are split and still commit.
#[tokio::test]
async fn test_insert_batch_larger_than_statement_limit() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool);

    let written = repo.insert_batch(&sample_recipes(22_000)).await.unwrap();

    assert_eq!(written, 22_000);
    assert_eq!(repo.get_stats().await.unwrap().total_recipes, 22_000);
}

#[tokio::test]
async fn test_inspect_schema_text_metadata() {
    let (pool, _container) = setup_test_db().await;
    let repo = RecipeRepository::new(pool);

    let schema = repo.inspect_schema().await.unwrap();

    assert_eq!(schema.embedding_dimension, Some(TEST_DIMENSION));
    assert_eq!(schema.metadata_type, MetadataType::Text);
    assert!(RecipeRepository::validate_embedding_dimension(&schema, TEST_DIMENSION).is_ok());
    assert!(RecipeRepository::validate_embedding_dimension(&schema, 768).is_err());
}

/// A jsonb metadata column is detected and accepts inserts.
#[tokio::test]
async fn test_insert_into_jsonb_metadata() {
    let (pool, _container) = setup_test_db_with(JSONB_SCHEMA).await;
    let repo = RecipeRepository::new(pool.clone());

    let schema = repo.inspect_schema().await.unwrap();
    assert_eq!(schema.metadata_type, MetadataType::Json);

    let repo = repo.with_metadata_type(schema.metadata_type);
    repo.insert_batch(&sample_recipes(2)).await.unwrap();

    let (n_steps,): (i64,) =
        sqlx::query_as("SELECT (metadata->>'n_steps')::bigint FROM recipes LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(n_steps, 2);
}

#[tokio::test]
async fn test_inspect_schema_missing_table() {
    let (pool, _container) = setup_test_db_with(&["CREATE EXTENSION IF NOT EXISTS vector"]).await;
    let repo = RecipeRepository::new(pool);

    let err = repo.inspect_schema().await.unwrap_err();
    assert!(matches!(err, AppError::ConfigError(_)));
}

#[tokio::test]
async fn test_connect_and_health_check() {
    let (settings, _container) = start_postgres().await;

    let mut repo = None;
    for _ in 0..30 {
        match RecipeRepository::connect(&settings).await {
            Ok(connected) => {
                repo = Some(connected);
                break;
            }
            Err(_) => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
        }
    }
    let repo = repo.expect("should connect");

    repo.health_check().await.expect("health check should pass");
}
