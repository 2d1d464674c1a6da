//! OpenAI-compatible `/v1/embeddings` provider (blocking HTTP)

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::features::retrieval::error::EmbeddingError;
use crate::features::retrieval::ports::EmbeddingProvider;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsRow {
    embedding: Vec<f64>,
}

/// Embedding provider over HTTP
pub struct OpenAiEmbedder {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OpenAiEmbedder {
    /// Build from configuration, reading the API key from the environment
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let api_key = std::env::var(OPENAI_API_KEY_ENV).unwrap_or_default();
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(EmbeddingError::MissingApiKey(OPENAI_API_KEY_ENV));
        }
        Self::new(config, api_key)
    }

    pub fn new(config: &EmbeddingConfig, api_key: String) -> Result<Self, EmbeddingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::Request(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/v1/embeddings", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        let body = json!({
            "model": self.model,
            "input": text,
            "encoding_format": "float"
        });

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| EmbeddingError::Request(format!("failed to reach {}: {e}", self.url)))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(EmbeddingError::Http { status, body });
        }

        let parsed: EmbeddingsResponse = resp
            .json()
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding in response".into()))?;

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                found: embedding.len(),
            });
        }
        debug!(model = %self.model, chars = text.len(), "embedded text");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> String {
        format!("openai:{}/{}", self.model, self.dimension)
    }
}
