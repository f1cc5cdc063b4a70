//! Test utilities and mock implementations for integration tests.
//!
//! Provides mock implementations of the core traits and a small CSV builder
//! for testing `ImportService` in isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sous_core::models::columns;
use sous_core::traits::{EmbeddingProvider, RecipeStore};
use sous_core::{AppError, ImportEvent, NewRecipe, ProgressReporter, SkipReason};

// =============================================================================
// MockEmbeddingProvider
// =============================================================================

/// Mock embedding provider that returns deterministic vectors.
///
/// Records every text it was asked to embed. Can be configured to fail
/// on the n-th call.
#[derive(Clone)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    calls: Arc<AtomicUsize>,
    texts: Arc<Mutex<Vec<String>>>,
    fail_on_call: Option<usize>,
}

impl MockEmbeddingProvider {
    /// Creates a new mock provider with 384 dimensions (e5-small-v2).
    pub fn new() -> Self {
        Self::with_dimension(384)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            calls: Arc::new(AtomicUsize::new(0)),
            texts: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
        }
    }

    /// Fails the call with the given 1-based index.
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(AppError::NetworkError("connection refused".to_string()));
        }
        self.texts.lock().unwrap().push(text.to_string());

        // Deterministic embedding based on text length
        let seed = text.len() as f32;
        Ok((0..self.dimension)
            .map(|i| (seed + i as f32) / 1000.0)
            .collect())
    }
}

// =============================================================================
// MockRecipeStore
// =============================================================================

/// In-memory recipe store that records each committed batch.
#[derive(Clone, Default)]
pub struct MockRecipeStore {
    batches: Arc<Mutex<Vec<Vec<NewRecipe>>>>,
    attempts: Arc<AtomicUsize>,
    fail_on_batch: Option<usize>,
}

impl MockRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the insert with the given 1-based batch index.
    pub fn failing_on(batch: usize) -> Self {
        Self {
            fail_on_batch: Some(batch),
            ..Self::default()
        }
    }

    /// Sizes of committed batches, in commit order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn rows(&self) -> Vec<NewRecipe> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

impl RecipeStore for MockRecipeStore {
    async fn insert_batch(&self, recipes: &[NewRecipe]) -> Result<u64, AppError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_batch == Some(attempt) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        self.batches.lock().unwrap().push(recipes.to_vec());
        Ok(recipes.len() as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

// =============================================================================
// RecordingReporter
// =============================================================================

/// Reporter that keeps a textual trace of the events it receives.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn skipped(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with("skipped"))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ImportEvent<'_>) {
        let line = match event {
            ImportEvent::Started { total } => format!("started {:?}", total),
            ImportEvent::RecordAccepted { name } => format!("accepted {}", name),
            ImportEvent::RecordSkipped { name, reason } => match reason {
                SkipReason::NoImages { raw } => format!("skipped {} no-images {}", name, raw),
                SkipReason::NoInstructions { raw } => {
                    format!("skipped {} no-instructions {}", name, raw)
                }
                SkipReason::Invalid { error } => format!("skipped {} invalid {}", name, error),
            },
            ImportEvent::BatchCommitted { rows, written } => {
                format!("committed {} {}", rows, written)
            }
            ImportEvent::Progress { current, .. } => format!("progress {}", current),
            ImportEvent::Completed { stats } => format!("completed {}", stats.written),
            ImportEvent::Failed { error } => format!("failed {}", error),
        };
        self.events.lock().unwrap().push(line);
    }
}

// =============================================================================
// CSV fixtures
// =============================================================================

/// A recipe row with valid defaults for every required column.
#[derive(Clone)]
pub struct RecipeRow {
    values: Vec<(&'static str, String)>,
}

impl RecipeRow {
    pub fn new(name: &str) -> Self {
        let values = columns::REQUIRED
            .iter()
            .map(|column| {
                let value = match *column {
                    columns::NAME => name.to_string(),
                    columns::CATEGORY => "Dessert".to_string(),
                    columns::KEYWORDS => r#"c("Easy")"#.to_string(),
                    columns::INGREDIENTS => r#"c("flour", "sugar")"#.to_string(),
                    columns::IMAGES => r#"c("http://a.jpg", "http://b.jpg")"#.to_string(),
                    columns::INSTRUCTIONS => r#"c("Mix.", "Bake.")"#.to_string(),
                    columns::DESCRIPTION => "Tasty.".to_string(),
                    columns::COOK_TIME => "PT30M".to_string(),
                    columns::PREP_TIME => "PT10M".to_string(),
                    columns::TOTAL_TIME => "PT40M".to_string(),
                    _ => "0".to_string(),
                };
                (*column, value)
            })
            .collect();
        Self { values }
    }

    pub fn set(mut self, column: &str, value: &str) -> Self {
        for (k, v) in self.values.iter_mut() {
            if *k == column {
                *v = value.to_string();
            }
        }
        self
    }
}

/// Serializes rows into CSV bytes with the full header.
pub fn csv_bytes(rows: &[RecipeRow]) -> Vec<u8> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns::REQUIRED).unwrap();
    for row in rows {
        writer
            .write_record(row.values.iter().map(|(_, v)| v.as_str()))
            .unwrap();
    }
    writer.into_inner().unwrap()
}

/// `count` valid rows named `Recipe 1..=count`.
pub fn valid_rows(count: usize) -> Vec<RecipeRow> {
    (1..=count)
        .map(|i| RecipeRow::new(&format!("Recipe {}", i)))
        .collect()
}
