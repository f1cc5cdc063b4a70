use std::time::Duration;

use clap::Parser;
use sous_client::openai::DEFAULT_ENDPOINT;
use sous_client::{EmbeddingBackend, EmbeddingConfig};
use sous_core::{DEFAULT_EMBEDDING_MODEL, HttpConfig};

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "sous-embed")]
#[command(author, version, about = "HTTP embedding service for Sous recipes")]
pub struct ServerConfig {
    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// OpenAI-compatible embeddings endpoint serving the model
    #[arg(long, env = "EMBEDDING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub embedding_endpoint: String,

    /// Bearer token for the embeddings endpoint
    #[arg(long, env = "EMBEDDING_API_KEY", hide_env_values = true)]
    pub embedding_api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Timeout for a single model request, in seconds
    #[arg(long, env = "EMBEDDING_TIMEOUT_SECS", default_value = "30")]
    pub embedding_timeout_secs: u64,
}

impl ServerConfig {
    /// Settings for the model backend.
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: EmbeddingBackend::OpenAI,
            endpoint: self.embedding_endpoint.clone(),
            api_key: self.embedding_api_key.clone(),
            model: self.embedding_model.clone(),
            http: HttpConfig {
                timeout: Duration::from_secs(self.embedding_timeout_secs),
            },
            ..EmbeddingConfig::default()
        }
    }
}
