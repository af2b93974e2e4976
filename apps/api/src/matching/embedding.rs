//! Embedding client: the single point of entry for the external embedding provider.
//!
//! Speaks the OpenAI-compatible `/v1/embeddings` wire format. Every returned
//! vector must have exactly `dimensions` components.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("expected {expected}-dimensional embedding, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("provider returned no embedding")]
    Empty,
}

/// Capability interface: text in, fixed-length dense vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// HTTP embedder with a per-request timeout and bounded retries.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl HttpEmbedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// One provider round trip, plus up to `max_retries` retries on transport
    /// errors, 429 and 5xx. The delay starts at `retry_backoff` and doubles per
    /// retry. Other 4xx and malformed vectors fail immediately.
    async fn request(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: text,
        };
        let mut retry: u32 = 0;

        loop {
            let error = match self.attempt(&body).await {
                Ok(vector) => {
                    debug!(retry, dims = vector.len(), "Embedding call succeeded");
                    return Ok(vector);
                }
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Retryable(e)) => e,
            };

            if retry >= self.config.max_retries {
                return Err(error);
            }
            retry += 1;
            let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
            let delay = self.config.retry_backoff.saturating_mul(factor);
            warn!(
                "Embedding attempt {} failed ({}), retrying after {}ms...",
                retry,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(&self, body: &EmbeddingRequest<'_>) -> Result<Vec<f32>, Attempt> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Attempt::Retryable(EmbeddingError::Http(e)))?;

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            warn!("Embedding API returned {}: {}", status, message);
            return Err(Attempt::Retryable(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            }));
        }

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(Attempt::Fatal(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fatal(EmbeddingError::Http(e)))?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(Attempt::Fatal(EmbeddingError::Empty))?;

        if vector.len() != self.config.dimensions {
            return Err(Attempt::Fatal(EmbeddingError::Dimension {
                expected: self.config.dimensions,
                actual: vector.len(),
            }));
        }
        Ok(vector)
    }
}

/// Outcome of a failed single attempt.
enum Attempt {
    Retryable(EmbeddingError),
    Fatal(EmbeddingError),
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request(text).await
    }
}
