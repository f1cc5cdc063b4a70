//! Configuration types for Sous components.
//!
//! These are plain values with defaults. Binaries fill them from command
//! line arguments and environment variables (see `sous-cli` and `sous-server`).

use std::time::Duration;

/// Rows per storage transaction.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Largest accepted CSV field, in bytes.
pub const DEFAULT_FIELD_SIZE_LIMIT: usize = 100_000_000;

/// Marker prepended to every document before embedding.
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Text embedded by startup and health probes.
pub const PROBE_TEXT: &str = "healthy";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "intfloat/e5-small-v2";

/// Import pipeline configuration.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Number of accepted rows written per transaction.
    pub batch_size: usize,
    /// Records with a field longer than this many bytes are skipped.
    ///
    /// Checked after the CSV reader has buffered the record, so this filters
    /// records but does not bound memory use.
    pub field_size_limit: usize,
    /// Prefix added to each content string before embedding.
    pub passage_prefix: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            field_size_limit: DEFAULT_FIELD_SIZE_LIMIT,
            passage_prefix: PASSAGE_PREFIX.to_string(),
        }
    }
}

impl ImportConfig {
    /// Sets the batch size. Values below one are raised to one.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn with_field_size_limit(mut self, limit: usize) -> Self {
        self.field_size_limit = limit;
        self
    }
}

/// Database connection settings.
///
/// Kept as discrete parts so credentials are never interpolated into a
/// connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            max_connections: 5,
        }
    }
}

/// HTTP client configuration for embedding backends.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}
