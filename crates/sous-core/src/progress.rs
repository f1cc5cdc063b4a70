//! Progress reporting for import runs.
//!
//! The pipeline emits [`ImportEvent`]s through a [`ProgressReporter`], so the
//! CLI can log while tests stay silent.

use tracing::{debug, error, info, warn};

use crate::error::RecordError;
use crate::stats::ImportStats;

/// Why a record was not imported.
#[derive(Debug, Clone, Copy)]
pub enum SkipReason<'a> {
    /// Images decoded to nothing. Carries the raw cell.
    NoImages { raw: &'a str },
    /// Instructions decoded to nothing. Carries the raw cell.
    NoInstructions { raw: &'a str },
    /// A decode or validation error.
    Invalid { error: &'a RecordError },
}

/// Events emitted during an import run.
#[derive(Debug, Clone, Copy)]
pub enum ImportEvent<'a> {
    /// Header validated; `total` is the record count when known.
    Started { total: Option<usize> },
    RecordAccepted { name: &'a str },
    RecordSkipped { name: &'a str, reason: SkipReason<'a> },
    /// A batch was inserted and committed.
    BatchCommitted { rows: u64, written: u64 },
    Progress { current: usize, total: Option<usize> },
    Completed { stats: &'a ImportStats },
    Failed { error: &'a str },
}

/// Receives import events.
pub trait ProgressReporter: Send + Sync {
    /// Called when an import event occurs.
    ///
    /// The default implementation does nothing (silent mode).
    fn report(&self, event: ImportEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Tracing-based reporter for CLI logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ImportEvent<'_>) {
        match event {
            ImportEvent::Started { total } => match total {
                Some(total) => info!(total, "Importing recipes..."),
                None => info!("Importing recipes..."),
            },
            ImportEvent::RecordAccepted { name } => {
                debug!(recipe = name, "Successfully processed");
            }
            ImportEvent::RecordSkipped { name, reason } => match reason {
                SkipReason::NoImages { raw } => {
                    warn!(recipe = name, images = raw, "Ignoring recipe, no Images");
                }
                SkipReason::NoInstructions { raw } => {
                    warn!(
                        recipe = name,
                        instructions = raw,
                        "Ignoring recipe, no Instructions"
                    );
                }
                SkipReason::Invalid { error } => {
                    warn!(recipe = name, error = %error, "Skipping invalid recipe");
                }
            },
            ImportEvent::BatchCommitted { rows, written } => {
                info!(rows, written, "Committed batch");
            }
            ImportEvent::Progress { current, total } => match total {
                Some(total) if total > 0 => {
                    let percent = current as f64 / total as f64 * 100.0;
                    info!("Processing recipes... {}/{} ({:.0}%)", current, total, percent);
                }
                _ => info!("Processing recipes... {}", current),
            },
            ImportEvent::Completed { stats } => {
                info!(
                    read = stats.read,
                    written = stats.written,
                    skipped = stats.skipped(),
                    batches = stats.batches,
                    "Finished importing recipes"
                );
            }
            ImportEvent::Failed { error } => {
                error!(error, "Import failed");
            }
        }
    }
}
