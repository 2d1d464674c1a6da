//! Provider used when no embedding service is configured

use crate::features::retrieval::error::EmbeddingError;
use crate::features::retrieval::ports::EmbeddingProvider;

/// Always fails, so every query runs with a degraded (zero) embedding.
#[derive(Debug, Clone)]
pub struct UnavailableEmbedder {
    dimension: usize,
    reason: String,
}

impl UnavailableEmbedder {
    pub fn new(dimension: usize, reason: impl Into<String>) -> Self {
        Self {
            dimension,
            reason: reason.into(),
        }
    }
}

impl EmbeddingProvider for UnavailableEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f64>, EmbeddingError> {
        Err(EmbeddingError::Unavailable(self.reason.clone()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
