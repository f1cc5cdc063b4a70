//! Integration tests for ImportService.
//!
//! These tests verify filtering, batching and failure handling of the
//! import pipeline using mock implementations.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::integration::common::{
    MockEmbeddingProvider, MockRecipeStore, RecipeRow, RecordingReporter, csv_bytes, valid_rows,
};
use sous_core::{AppError, ImportConfig, ImportService, RecipeMetadata, SilentReporter};

fn service(
    store: &MockRecipeStore,
    embedding: &MockEmbeddingProvider,
    batch_size: usize,
) -> ImportService<MockRecipeStore, MockEmbeddingProvider> {
    let config = ImportConfig::default().with_batch_size(batch_size);
    ImportService::with_config(store.clone(), embedding.clone(), config)
}

/// A well-formed row is embedded and stored with its decoded metadata.
#[tokio::test]
async fn test_import_accepts_valid_row() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[RecipeRow::new("Apple Pie")]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.read, 1);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.written, 1);
    assert_eq!(stats.skipped(), 0);

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].content.contains("2 steps, 2 ingredients"));
    assert_eq!(rows[0].embedding.as_slice().len(), 384);

    let metadata: RecipeMetadata = serde_json::from_str(&rows[0].metadata).unwrap();
    assert_eq!(metadata.name, "Apple Pie");
    assert_eq!(metadata.n_ingredients, 2);
    assert_eq!(metadata.n_steps, 2);
    assert_eq!(metadata.images, vec!["http://a.jpg", "http://b.jpg"]);
    assert_eq!(metadata.calories, 0.0);
}

/// The embedded text is the stored content with the passage prefix.
#[tokio::test]
async fn test_import_embeds_prefixed_content() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[RecipeRow::new("Apple Pie")]);

    service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    let texts = embedding.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0], format!("passage: {}", store.rows()[0].content));
}

/// A row whose Images cell has no recognized prefix is skipped before
/// any embedding call.
#[tokio::test]
async fn test_import_skips_row_without_images() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let reporter = RecordingReporter::default();
    let data = csv_bytes(&[RecipeRow::new("Bare").set("Images", "\"\"")]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &reporter)
        .await
        .unwrap();

    assert_eq!(stats.skipped_no_images, 1);
    assert_eq!(stats.written, 0);
    assert_eq!(embedding.calls(), 0);
    assert!(store.batch_sizes().is_empty());
    assert_eq!(reporter.skipped(), vec!["skipped Bare no-images \"\""]);
}

#[tokio::test]
async fn test_import_skips_row_without_instructions() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[RecipeRow::new("Silent").set("RecipeInstructions", "character(0)")]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.skipped_no_instructions, 1);
    assert_eq!(embedding.calls(), 0);
}

/// A bare quoted URL is accepted as a single image.
#[tokio::test]
async fn test_import_accepts_bare_image_url() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[RecipeRow::new("Single").set("Images", "\"http://x.jpg\"")]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.written, 1);
    let metadata: RecipeMetadata = serde_json::from_str(&store.rows()[0].metadata).unwrap();
    assert_eq!(metadata.images, vec!["\"http://x.jpg\""]);
}

/// A non-numeric nutrition value skips the row without embedding it.
#[tokio::test]
async fn test_import_skips_non_numeric_row() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let reporter = RecordingReporter::default();
    let data = csv_bytes(&[
        RecipeRow::new("Bad").set("Calories", "NA"),
        RecipeRow::new("Good"),
    ]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &reporter)
        .await
        .unwrap();

    assert_eq!(stats.skipped_invalid, 1);
    assert_eq!(stats.written, 1);
    assert_eq!(embedding.calls(), 1);
    assert_eq!(reporter.skipped().len(), 1);
    assert!(reporter.skipped()[0].starts_with("skipped Bad invalid"));
}

/// A malformed vector literal skips the row and the run continues.
#[tokio::test]
async fn test_import_skips_malformed_literal() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[
        RecipeRow::new("Broken").set("Images", "c(\"http://a.jpg\""),
        RecipeRow::new("Fine"),
    ]);

    let stats = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.skipped_invalid, 1);
    assert_eq!(stats.written, 1);
}

/// Oversized fields skip the record.
#[tokio::test]
async fn test_import_skips_oversized_field() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[RecipeRow::new("Long").set("Description", &"x".repeat(64))]);
    let config = ImportConfig::default().with_field_size_limit(32);

    let stats = ImportService::with_config(store.clone(), embedding.clone(), config)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.skipped_invalid, 1);
    assert_eq!(embedding.calls(), 0);
}

/// Accepted rows are flushed once per full batch plus once for the remainder.
#[tokio::test]
async fn test_import_flushes_full_batches_and_remainder() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&valid_rows(7));

    let stats = service(&store, &embedding, 3)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(store.batch_sizes(), vec![3, 3, 1]);
    assert_eq!(stats.batches, 3);
    assert_eq!(stats.written, 7);
    assert_eq!(stats.accepted, 7);
}

/// An exact multiple of the batch size produces no trailing empty flush.
#[tokio::test]
async fn test_import_exact_multiple_has_no_empty_flush() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&valid_rows(6));

    service(&store, &embedding, 3)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(store.batch_sizes(), vec![3, 3]);
}

/// Skipped rows do not count toward batch fill.
#[tokio::test]
async fn test_import_batches_count_only_accepted_rows() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let mut rows = valid_rows(4);
    rows.insert(1, RecipeRow::new("Skip").set("Images", ""));
    rows.insert(3, RecipeRow::new("Skip too").set("Calories", "?"));
    let data = csv_bytes(&rows);

    let stats = service(&store, &embedding, 2)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.read, 6);
    assert_eq!(stats.skipped(), 2);
    assert_eq!(store.batch_sizes(), vec![2, 2]);
    assert_eq!(stats.written as usize, stats.accepted);
}

/// Empty input completes without writing anything.
#[tokio::test]
async fn test_import_empty_file() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = csv_bytes(&[]);

    let stats = service(&store, &embedding, 3)
        .import_reader_with_progress(data.as_slice(), Some(0), &SilentReporter)
        .await
        .unwrap();

    assert_eq!(stats.read, 0);
    assert!(store.batch_sizes().is_empty());
}

/// A storage failure aborts the run; earlier batches stay committed.
#[tokio::test]
async fn test_import_storage_failure_is_fatal() {
    let store = MockRecipeStore::failing_on(2);
    let embedding = MockEmbeddingProvider::new();
    let reporter = RecordingReporter::default();
    let data = csv_bytes(&valid_rows(5));

    let result = service(&store, &embedding, 2)
        .import_reader_with_progress(data.as_slice(), None, &reporter)
        .await;

    assert!(matches!(result, Err(AppError::DatabaseError(_))));
    assert_eq!(store.batch_sizes(), vec![2]);
    assert!(
        reporter
            .events()
            .last()
            .is_some_and(|e| e.starts_with("failed"))
    );
}

/// An embedding failure aborts the run.
#[tokio::test]
async fn test_import_embedding_failure_is_fatal() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::failing_on(2);
    let data = csv_bytes(&valid_rows(3));

    let result = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_slice(), None, &SilentReporter)
        .await;

    assert!(matches!(result, Err(AppError::NetworkError(_))));
    assert!(store.batch_sizes().is_empty());
}

/// A header without a required column fails before any row is processed.
#[tokio::test]
async fn test_import_missing_column_is_fatal() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let data = "Name,Images\nPie,\"c(\"\"http://a.jpg\"\")\"\n";

    let result = service(&store, &embedding, 10)
        .import_reader_with_progress(data.as_bytes(), None, &SilentReporter)
        .await;

    match result {
        Err(AppError::ConfigError(msg)) => assert!(msg.contains("RecipeInstructions")),
        other => panic!("expected ConfigError, got {:?}", other),
    }
    assert_eq!(embedding.calls(), 0);
}

/// Multi-line quoted cells are handled and counted as one record.
#[tokio::test]
async fn test_import_path_counts_and_imports() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::new();
    let reporter = RecordingReporter::default();
    let rows = vec![
        RecipeRow::new("Layered").set("Description", "first line\nsecond line"),
        RecipeRow::new("Plain"),
    ];

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&csv_bytes(&rows)).unwrap();
    file.flush().unwrap();

    let stats = service(&store, &embedding, 10)
        .import_path_with_progress(file.path(), &reporter)
        .await
        .unwrap();

    assert_eq!(stats.written, 2);
    assert_eq!(reporter.events()[0], "started Some(2)");
    assert!(store.rows()[0].content.contains("first line\nsecond line"));
}

#[tokio::test]
async fn test_probe_dimension() {
    let store = MockRecipeStore::new();
    let embedding = MockEmbeddingProvider::with_dimension(16);

    let dimension = service(&store, &embedding, 10)
        .probe_dimension()
        .await
        .unwrap();

    assert_eq!(dimension, 16);
    assert_eq!(embedding.texts(), vec!["healthy"]);
}
