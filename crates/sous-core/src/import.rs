//! Import service for recipe CSV files.
//!
//! The [`ImportService`] streams a recipe CSV, filters and transforms each
//! record, embeds the resulting document and writes accepted rows to storage
//! in fixed-size transactions.
//!
//! # Architecture
//!
//! The service is generic over two traits:
//! - [`RecipeStore`] - for database writes
//! - [`EmbeddingProvider`] - for generating embeddings
//!
//! Tests drive the whole pipeline with in-memory mocks.
//!
//! # Failure model
//!
//! Per-record problems (undecodable literals, non-numeric nutrition values,
//! oversized fields, empty image or instruction lists) skip the record and
//! are reported through the [`ProgressReporter`]. Everything else aborts the
//! run: a missing header column, an unreadable CSV, an embedding failure or
//! a failed insert/commit. Rows committed by earlier batches stay committed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use pgvector::Vector;
use tracing::error;

use crate::config::ImportConfig;
use crate::decoder::{decode_images, decode_instructions};
use crate::error::RecordError;
use crate::models::{NewRecipe, RawRecord, columns};
use crate::progress::{ImportEvent, ProgressReporter, SilentReporter, SkipReason};
use crate::stats::{ImportStats, RecordOutcome};
use crate::traits::{EmbeddingProvider, RecipeStore};
use crate::{AppError, PROBE_TEXT, transform};

/// Progress events are emitted every this many records when the total is unknown.
const DEFAULT_REPORT_INTERVAL: usize = 1000;

/// Result of preparing a single record.
enum Prepared {
    Accepted(NewRecipe),
    Skipped(RecordOutcome),
}

/// Service for importing recipes into a vector store.
///
/// # Example
///
/// ```ignore
/// use sous_core::{ImportService, TracingReporter};
///
/// let service = ImportService::new(repo, embedding);
/// let stats = service
///     .import_path_with_progress("recipes.csv", &TracingReporter)
///     .await?;
/// println!("Imported {} recipes", stats.written);
/// ```
pub struct ImportService<S, E>
where
    S: RecipeStore,
    E: EmbeddingProvider,
{
    store: S,
    embedding: E,
    config: ImportConfig,
}

impl<S, E> Clone for ImportService<S, E>
where
    S: RecipeStore,
    E: EmbeddingProvider,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            embedding: self.embedding.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, E> ImportService<S, E>
where
    S: RecipeStore,
    E: EmbeddingProvider,
{
    /// Creates a new import service with default configuration.
    pub fn new(store: S, embedding: E) -> Self {
        Self::with_config(store, embedding, ImportConfig::default())
    }

    /// Creates an import service with custom configuration.
    pub fn with_config(store: S, embedding: E, config: ImportConfig) -> Self {
        Self {
            store,
            embedding,
            config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Imports a CSV file without progress reporting.
    pub async fn import_path(&self, path: impl AsRef<Path>) -> Result<ImportStats, AppError> {
        self.import_path_with_progress(path, &SilentReporter).await
    }

    /// Imports a CSV file, reporting progress through `reporter`.
    ///
    /// The file is read twice: a counting pass for progress totals, then the
    /// import itself.
    pub async fn import_path_with_progress<R: ProgressReporter>(
        &self,
        path: impl AsRef<Path>,
        reporter: &R,
    ) -> Result<ImportStats, AppError> {
        let path = path.as_ref();
        let total = count_records(File::open(path)?).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to count recipes");
        })?;
        let file = File::open(path)?;
        self.import_reader_with_progress(file, Some(total), reporter)
            .await
    }

    /// Imports CSV data from any reader.
    ///
    /// `total` is only used for progress reporting.
    pub async fn import_reader_with_progress<Rd: Read, R: ProgressReporter>(
        &self,
        reader: Rd,
        total: Option<usize>,
        reporter: &R,
    ) -> Result<ImportStats, AppError> {
        let result = self.run(reader, total, reporter).await;
        if let Err(e) = &result {
            reporter.report(ImportEvent::Failed {
                error: &e.to_string(),
            });
        }
        result
    }

    /// Embeds the probe text once and returns the vector dimension.
    pub async fn probe_dimension(&self) -> Result<usize, AppError> {
        probe_dimension(&self.embedding).await
    }

    async fn run<Rd: Read, R: ProgressReporter>(
        &self,
        reader: Rd,
        total: Option<usize>,
        reporter: &R,
    ) -> Result<ImportStats, AppError> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = csv.headers()?.clone();
        check_headers(&headers)?;

        reporter.report(ImportEvent::Started { total });

        let report_interval = total
            .map(|t| (t / 20).max(50))
            .unwrap_or(DEFAULT_REPORT_INTERVAL);
        let batch_size = self.config.batch_size.max(1);

        let mut stats = ImportStats::new();
        let mut batch: Vec<NewRecipe> = Vec::with_capacity(batch_size.min(DEFAULT_REPORT_INTERVAL));

        for row in csv.records() {
            let row = row?;
            stats.read += 1;

            let record: RawRecord = headers.iter().zip(row.iter()).collect();
            match self.prepare(&record, reporter).await? {
                Prepared::Accepted(recipe) => {
                    stats.record(RecordOutcome::Accepted);
                    reporter.report(ImportEvent::RecordAccepted {
                        name: record.name(),
                    });
                    batch.push(recipe);
                    if batch.len() == batch_size {
                        self.flush(&mut batch, &mut stats, reporter).await?;
                    }
                }
                Prepared::Skipped(outcome) => stats.record(outcome),
            }

            if stats.read % report_interval == 0 {
                reporter.report(ImportEvent::Progress {
                    current: stats.read,
                    total,
                });
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut stats, reporter).await?;
        }

        reporter.report(ImportEvent::Completed { stats: &stats });
        Ok(stats)
    }

    /// Filters, transforms and embeds one record.
    ///
    /// Only embedding and serialization failures are returned as errors;
    /// everything record-local becomes a skip.
    async fn prepare<R: ProgressReporter>(
        &self,
        record: &RawRecord,
        reporter: &R,
    ) -> Result<Prepared, AppError> {
        let name = record.name();
        let skip_invalid = |error: &RecordError| {
            reporter.report(ImportEvent::RecordSkipped {
                name,
                reason: SkipReason::Invalid { error },
            });
            Prepared::Skipped(RecordOutcome::Invalid)
        };

        if let Some(err) = record.oversized_field(self.config.field_size_limit) {
            return Ok(skip_invalid(&err));
        }

        let images_raw = match record.get(columns::IMAGES) {
            Ok(raw) => raw,
            Err(e) => return Ok(skip_invalid(&e)),
        };
        let instructions_raw = match record.get(columns::INSTRUCTIONS) {
            Ok(raw) => raw,
            Err(e) => return Ok(skip_invalid(&e)),
        };

        let images = match decode_images(images_raw) {
            Ok(images) => images,
            Err(e) => return Ok(skip_invalid(&e)),
        };
        let instructions = match decode_instructions(instructions_raw) {
            Ok(instructions) => instructions,
            Err(e) => return Ok(skip_invalid(&e)),
        };

        if images.is_empty() {
            reporter.report(ImportEvent::RecordSkipped {
                name,
                reason: SkipReason::NoImages { raw: images_raw },
            });
            return Ok(Prepared::Skipped(RecordOutcome::NoImages));
        }
        if instructions.is_empty() {
            reporter.report(ImportEvent::RecordSkipped {
                name,
                reason: SkipReason::NoInstructions {
                    raw: instructions_raw,
                },
            });
            return Ok(Prepared::Skipped(RecordOutcome::NoInstructions));
        }

        let metadata = match transform::build_metadata(record) {
            Ok(metadata) => metadata,
            Err(e) => return Ok(skip_invalid(&e)),
        };
        let content = match transform::build_content(record) {
            Ok(content) => content,
            Err(e) => return Ok(skip_invalid(&e)),
        };

        let text = format!("{}{}", self.config.passage_prefix, content);
        let embedding = self.embedding.generate(&text).await.inspect_err(|e| {
            error!(recipe = name, error = %e, "Failed to generate embedding");
        })?;
        let metadata = serde_json::to_string(&metadata)?;

        Ok(Prepared::Accepted(NewRecipe {
            content,
            embedding: Vector::from(embedding),
            metadata,
        }))
    }

    /// Writes the pending batch in one transaction and clears it.
    async fn flush<R: ProgressReporter>(
        &self,
        batch: &mut Vec<NewRecipe>,
        stats: &mut ImportStats,
        reporter: &R,
    ) -> Result<(), AppError> {
        let rows = self.store.insert_batch(batch).await.inspect_err(|e| {
            error!(rows = batch.len(), error = %e, "Failed to write batch");
        })?;
        batch.clear();
        stats.written += rows;
        stats.batches += 1;
        reporter.report(ImportEvent::BatchCommitted {
            rows,
            written: stats.written,
        });
        Ok(())
    }
}

/// Embeds the probe text once and returns the vector dimension.
///
/// Fails with [`AppError::EmptyResponse`] when the provider returns an empty vector.
pub async fn probe_dimension<E: EmbeddingProvider>(embedding: &E) -> Result<usize, AppError> {
    let vector = embedding.generate(PROBE_TEXT).await?;
    if vector.is_empty() {
        return Err(AppError::EmptyResponse);
    }
    Ok(vector.len())
}

/// Counts data records (not physical lines) in a CSV source.
pub fn count_records<Rd: Read>(reader: Rd) -> Result<usize, AppError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut record = csv::ByteRecord::new();
    let mut count = 0;
    while csv.read_byte_record(&mut record)? {
        count += 1;
    }
    Ok(count)
}

/// Fails when the header lacks any column the transformer reads.
fn check_headers(headers: &StringRecord) -> Result<(), AppError> {
    let missing: Vec<&str> = columns::REQUIRED
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!(
            "CSV is missing required columns: {}",
            missing.join(", ")
        )))
    }
}
