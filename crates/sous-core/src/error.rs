use thiserror::Error;

use crate::literal::LiteralError;

/// Run-level error types.
///
/// Any `AppError` escaping the import pipeline terminates the run. Problems
/// confined to a single CSV record are reported as [`RecordError`] instead and
/// never surface here.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `sqlx::Error` → `AppError::DatabaseError`
/// - `csv::Error` → `AppError::CsvError`
/// - `std::io::Error` → `AppError::IoError`
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// # Examples
///
/// ```no_run
/// use sous_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// Wraps connection failures, query errors, constraint violations and
    /// failed commits.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// The CSV source could not be read or is structurally malformed.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Reading the input file failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP request to the embedding backend failed.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Network or connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimitExceeded,

    /// The embedding backend answered successfully but without data.
    #[error("Empty response from API")]
    EmptyResponse,

    /// Invalid or inconsistent configuration.
    ///
    /// Also raised when the CSV header lacks a required column or when the
    /// model dimension does not match the storage column.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DatabaseError(e) => {
                if e.to_string().contains("connection") {
                    "Cannot connect to database. Is PostgreSQL running?\n   Check DB_HOST, DB_PORT and DB_USER.".to_string()
                } else {
                    format!("Database error: {}", e)
                }
            }
            AppError::CsvError(e) => {
                format!("Cannot read recipe CSV: {}\n   Check the file format.", e)
            }
            AppError::IoError(e) => format!("Cannot open input: {}", e),
            AppError::ClientError(msg) => {
                if msg.contains("timeout") || msg.contains("timed out") {
                    "Embedding request timed out.\n   The model backend may be overloaded."
                        .to_string()
                } else {
                    format!("Embedding API error: {}", msg)
                }
            }
            AppError::NetworkError(msg) => {
                format!(
                    "Network error: {}\n   Is the embedding backend running?",
                    msg
                )
            }
            AppError::Timeout(secs) => {
                format!("Request timed out after {} seconds.", secs)
            }
            AppError::RateLimitExceeded => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            AppError::EmptyResponse => {
                "The embedding backend returned no data.".to_string()
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n   Check your environment and arguments.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if the embedding backend could not be reached or did not answer.
    ///
    /// The embedding service uses this to answer `503` instead of `500`.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::RateLimitExceeded
                | AppError::EmptyResponse
                | AppError::ClientError(_)
        )
    }
}

/// Recoverable, per-record failure.
///
/// Produced while decoding or transforming a single CSV row. The import
/// pipeline logs it and skips the row; the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A `c(...)` vector literal could not be parsed.
    #[error("malformed vector literal {text:?}: {source}")]
    MalformedLiteral {
        text: String,
        #[source]
        source: LiteralError,
    },

    /// A column expected by the transformer is absent from the record.
    #[error("missing field {0}")]
    MissingField(String),

    /// A required numeric field does not parse as a floating-point value.
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    /// A field exceeds the configured size cap.
    #[error("field {field} is {len} bytes, limit is {limit}")]
    FieldTooLarge {
        field: String,
        len: usize,
        limit: usize,
    },
}
