//! Import statistics.

/// Outcome of processing a single CSV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Record embedded and queued for storage.
    Accepted,
    /// Images decoded to an empty list.
    NoImages,
    /// Instructions decoded to an empty list.
    NoInstructions,
    /// Decoding, validation, metadata or content building failed.
    Invalid,
}

/// Statistics for an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// CSV records read.
    pub read: usize,
    /// Records embedded and queued for storage.
    pub accepted: usize,
    /// Rows committed to storage.
    pub written: u64,
    pub skipped_no_images: usize,
    pub skipped_no_instructions: usize,
    pub skipped_invalid: usize,
    /// Committed transactions.
    pub batches: usize,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome, incrementing the appropriate counter.
    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Accepted => self.accepted += 1,
            RecordOutcome::NoImages => self.skipped_no_images += 1,
            RecordOutcome::NoInstructions => self.skipped_no_instructions += 1,
            RecordOutcome::Invalid => self.skipped_invalid += 1,
        }
    }

    /// Returns the number of skipped records.
    pub fn skipped(&self) -> usize {
        self.skipped_no_images + self.skipped_no_instructions + self.skipped_invalid
    }
}
