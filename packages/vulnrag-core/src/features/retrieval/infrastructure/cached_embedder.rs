//! Embedding provider decorator backed by an `EmbeddingCache`

use std::sync::Arc;
use tracing::{debug, warn};
use vulnrag_storage::{scoped_key, EmbeddingCache};

use crate::features::retrieval::error::EmbeddingError;
use crate::features::retrieval::ports::EmbeddingProvider;

/// Looks vectors up by content hash before calling the wrapped provider.
/// Keys are scoped by the provider's `model_id`, so one cache can back
/// several models.
///
/// Cache failures never fail an embedding: a broken read is a miss and a
/// broken write is logged.
pub struct CachedEmbedder<P> {
    provider: P,
    cache: Arc<dyn EmbeddingCache>,
    model_id: String,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    pub fn new(provider: P, cache: Arc<dyn EmbeddingCache>) -> Self {
        let model_id = provider.model_id();
        Self {
            provider,
            cache,
            model_id,
        }
    }

    /// Cache key for `text` under the wrapped provider's model
    pub fn key(&self, text: &str) -> String {
        scoped_key(&self.model_id, text)
    }

    pub fn cache(&self) -> &Arc<dyn EmbeddingCache> {
        &self.cache
    }

    /// Persist buffered cache writes
    pub fn flush(&self) {
        if let Err(e) = self.cache.flush() {
            warn!(backend = self.cache.backend_name(), error = %e, "embedding cache flush failed");
        }
    }

    fn lookup(&self, key: &str) -> Option<Vec<f64>> {
        match self.cache.get(key) {
            Ok(Some(vector)) if vector.len() == self.provider.dimension() => Some(vector),
            Ok(Some(vector)) => {
                warn!(
                    key,
                    found = vector.len(),
                    expected = self.provider.dimension(),
                    "ignoring cached embedding of wrong dimension"
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(backend = self.cache.backend_name(), error = %e, "embedding cache read failed");
                None
            }
        }
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        let key = self.key(text);
        if let Some(vector) = self.lookup(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(vector);
        }

        let vector = self.provider.embed(text)?;
        if let Err(e) = self.cache.put(&key, vector.clone()) {
            warn!(backend = self.cache.backend_name(), error = %e, "embedding cache write failed");
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }
}
