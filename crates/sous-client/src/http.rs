//! Error mapping shared by the HTTP embedding clients.

use reqwest::Client;
use serde::Deserialize;
use sous_core::HttpConfig;
use sous_core::error::AppError;

/// Builds a reqwest client with the configured timeout.
pub(crate) fn build_client(config: &HttpConfig) -> Result<Client, AppError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::ClientError(e.to_string()))
}

/// Maps a transport failure to an [`AppError`].
pub(crate) fn map_send_error(error: reqwest::Error, backend: &str, timeout_secs: u64) -> AppError {
    if error.is_timeout() {
        AppError::Timeout(timeout_secs)
    } else if error.is_connect() {
        AppError::NetworkError(format!("Cannot connect to {}: {}", backend, error))
    } else {
        AppError::ClientError(error.to_string())
    }
}

/// OpenAI-style `{"error": {"message": ..}}` body.
#[derive(Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

/// `{"detail": ..}` (FastAPI) or `{"error": .., "message": ..}` (sous-embed) body.
#[derive(Deserialize)]
struct DetailError {
    detail: Option<String>,
    message: Option<String>,
}

/// Extracts the most useful message from an error body.
fn error_message(status_code: u16, body: &str) -> String {
    if let Ok(e) = serde_json::from_str::<OpenAIError>(body) {
        e.error.message
    } else if let Some(message) = serde_json::from_str::<DetailError>(body)
        .ok()
        .and_then(|e| e.detail.or(e.message))
    {
        message
    } else {
        format!("HTTP {}: {}", status_code, body)
    }
}

/// Maps a non-success HTTP status to an [`AppError`].
pub(crate) fn map_status_error(status_code: u16, body: &str, backend: &str) -> AppError {
    let message = error_message(status_code, body);
    match status_code {
        401 | 403 => AppError::ClientError(format!(
            "{} authentication failed: {}. Check EMBEDDING_API_KEY.",
            backend, message
        )),
        429 => AppError::RateLimitExceeded,
        502..=504 => AppError::NetworkError(format!("{} unavailable: {}", backend, message)),
        _ => AppError::ClientError(format!("{} error: {}", backend, message)),
    }
}
