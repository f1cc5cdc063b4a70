use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use sous_client::openai::DEFAULT_ENDPOINT;
use sous_client::service::DEFAULT_SERVICE_URL;
use sous_client::{EmbeddingBackend, EmbeddingConfig};
use sous_core::{
    DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_MODEL, DEFAULT_FIELD_SIZE_LIMIT, DbSettings, HttpConfig,
    ImportConfig,
};

static VERSION_INFO: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");

    let commit = option_env!("VERGEN_GIT_SHA")
        .map(|s| s.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "unknown".to_string());

    let built = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"); // YYYY-MM-DD
    let target = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");
    let rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");

    format!("{version}\ncommit: {commit}\nbuilt: {built}\ntarget: {target}\nrustc: {rustc}")
});

pub fn version_info() -> &'static str {
    &VERSION_INFO
}

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "sous")]
#[command(
    author,
    version = version_info(),
    about = "Import recipe CSV exports into a pgvector store"
)]
#[command(after_help = "Examples:
  sous import recipes.csv
  sous import recipes.csv --batch-size 500
  sous stats

Embedding providers:
  EMBEDDING_PROVIDER=openai (default) - OpenAI-compatible /v1/embeddings endpoint
  EMBEDDING_PROVIDER=service          - Sous embedding service (sous-embed)")]
pub struct Config {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "postgres")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASS", default_value = "postgres", hide_env_values = true)]
    pub db_pass: String,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value = "5")]
    pub db_max_connections: u32,

    /// Embedding provider to use: openai (default) or service
    #[arg(long, env = "EMBEDDING_PROVIDER", default_value = "openai")]
    pub embedding_provider: EmbeddingBackend,

    /// OpenAI-compatible embeddings endpoint (embedding_provider=openai)
    #[arg(long, env = "EMBEDDING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub embedding_endpoint: String,

    /// Embedding service base URL (embedding_provider=service)
    #[arg(long, env = "EMBEDDING_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub embedding_service_url: String,

    /// Bearer token for the embeddings endpoint
    #[arg(long, env = "EMBEDDING_API_KEY", hide_env_values = true)]
    pub embedding_api_key: Option<String>,

    /// Embedding model name
    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Timeout for a single embedding request, in seconds
    #[arg(long, env = "EMBEDDING_TIMEOUT_SECS", default_value = "30")]
    pub embedding_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import recipes from a CSV export
    #[command(after_help = "Examples:
  sous import recipes.csv
  sous import recipes.csv --batch-size 500 --field-size-limit 1000000")]
    Import {
        /// Path to the recipe CSV file
        #[arg(value_name = "CSV")]
        path: PathBuf,

        /// Accepted rows written per transaction
        #[arg(
            short,
            long,
            env = "IMPORT_BATCH_SIZE",
            default_value_t = DEFAULT_BATCH_SIZE,
            value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
        )]
        batch_size: usize,

        /// Records with a field larger than this many bytes are skipped
        #[arg(long, env = "CSV_FIELD_SIZE_LIMIT", default_value_t = DEFAULT_FIELD_SIZE_LIMIT)]
        field_size_limit: usize,
    },
    /// Show database statistics
    Stats,
}

impl Config {
    /// Database settings assembled from the discrete `DB_*` values.
    pub fn db_settings(&self) -> DbSettings {
        DbSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            name: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_pass.clone(),
            max_connections: self.db_max_connections,
        }
    }

    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: self.embedding_provider,
            endpoint: self.embedding_endpoint.clone(),
            service_url: self.embedding_service_url.clone(),
            api_key: self.embedding_api_key.clone(),
            model: self.embedding_model.clone(),
            http: HttpConfig {
                timeout: Duration::from_secs(self.embedding_timeout_secs),
            },
        }
    }
}

/// Import settings for the `import` subcommand.
pub fn import_config(batch_size: usize, field_size_limit: usize) -> ImportConfig {
    ImportConfig::default()
        .with_batch_size(batch_size)
        .with_field_size_limit(field_size_limit)
}
