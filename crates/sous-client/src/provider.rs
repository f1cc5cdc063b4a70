//! Embedding provider factory and dynamic dispatch.
//!
//! The [`EmbeddingProvider`] trait uses `impl Future` return types (RPITIT),
//! which makes it not object-safe. [`EmbeddingProviderEnum`] provides runtime
//! selection while keeping the async trait syntax.
//!
//! # Usage
//!
//! ```no_run
//! use sous_client::provider::{EmbeddingBackend, EmbeddingConfig, EmbeddingProviderEnum};
//! use sous_core::traits::EmbeddingProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EmbeddingConfig {
//!     backend: EmbeddingBackend::Service,
//!     ..EmbeddingConfig::default()
//! };
//! let provider = EmbeddingProviderEnum::from_config(&config)?;
//! println!("Using {} provider ({})", provider.name(), provider.model());
//! let embedding = provider.generate("passage: Hello world").await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use sous_core::error::AppError;
use sous_core::traits::EmbeddingProvider;
use sous_core::{DEFAULT_EMBEDDING_MODEL, HttpConfig};

use crate::openai::DEFAULT_ENDPOINT;
use crate::service::DEFAULT_SERVICE_URL;
use crate::{EmbeddingServiceClient, OpenAIClient};

/// Which embedding backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    /// An OpenAI-compatible `/v1/embeddings` endpoint.
    #[default]
    OpenAI,
    /// The Sous embedding service (`POST /embedding`).
    Service,
}

impl FromStr for EmbeddingBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "service" => Ok(Self::Service),
            other => Err(AppError::ConfigError(format!(
                "unknown embedding provider {:?} (expected \"openai\" or \"service\")",
                other
            ))),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => f.write_str("openai"),
            Self::Service => f.write_str("service"),
        }
    }
}

/// Settings for building an embedding provider.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Full URL of the OpenAI-compatible embeddings route.
    pub endpoint: String,
    /// Base URL of the embedding service.
    pub service_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub http: HttpConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            api_key: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

/// Unified embedding provider that wraps concrete implementations.
#[derive(Clone)]
pub enum EmbeddingProviderEnum {
    /// OpenAI-compatible endpoint.
    OpenAI(OpenAIClient),
    /// Sous embedding service.
    Service(EmbeddingServiceClient),
}

impl EmbeddingProviderEnum {
    /// Builds the provider selected by `config.backend`.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, AppError> {
        match config.backend {
            EmbeddingBackend::OpenAI => Ok(Self::OpenAI(OpenAIClient::with_config(
                &config.endpoint,
                &config.model,
                config.api_key.as_deref(),
                &config.http,
            )?)),
            EmbeddingBackend::Service => Ok(Self::Service(EmbeddingServiceClient::with_config(
                &config.service_url,
                &config.model,
                &config.http,
            )?)),
        }
    }

    /// Human-readable target for startup logs.
    pub fn target(&self) -> &str {
        match self {
            Self::OpenAI(c) => c.endpoint(),
            Self::Service(c) => c.base_url(),
        }
    }
}

impl EmbeddingProvider for EmbeddingProviderEnum {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAI(c) => c.name(),
            Self::Service(c) => c.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::OpenAI(c) => EmbeddingProvider::model(c),
            Self::Service(c) => EmbeddingProvider::model(c),
        }
    }

    async fn generate(&self, text: &str) -> Result<Vec<f32>, AppError> {
        match self {
            Self::OpenAI(c) => c.generate(text).await,
            Self::Service(c) => c.generate(text).await,
        }
    }
}
