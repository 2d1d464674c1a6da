//! Embedding provider and cache assembly from configuration

use std::sync::Arc;
use tracing::{info, warn};
use vulnrag_storage::{EmbeddingCache, InMemoryEmbeddingCache, JsonFileEmbeddingCache, StorageError};

use crate::config::{CacheBackend, CacheConfig, EmbeddingConfig};
use crate::features::retrieval::infrastructure::cached_embedder::CachedEmbedder;
use crate::features::retrieval::infrastructure::unavailable_embedder::UnavailableEmbedder;
use crate::features::retrieval::ports::EmbeddingProvider;

/// Open the configured cache backend
pub fn open_cache(config: &CacheConfig) -> Result<Arc<dyn EmbeddingCache>, StorageError> {
    let path = || {
        config
            .path
            .as_ref()
            .ok_or_else(|| StorageError::config("cache.path is required for persistent backends"))
    };

    let cache: Arc<dyn EmbeddingCache> = match config.backend {
        CacheBackend::Memory => Arc::new(InMemoryEmbeddingCache::new()),
        CacheBackend::Json => Arc::new(JsonFileEmbeddingCache::open(path()?, config.flush_every)?),
        #[cfg(feature = "sqlite")]
        CacheBackend::Sqlite => Arc::new(vulnrag_storage::SqliteEmbeddingCache::new(path()?)?),
        #[cfg(not(feature = "sqlite"))]
        CacheBackend::Sqlite => {
            return Err(StorageError::config(
                "sqlite cache backend requires the `sqlite` feature",
            ))
        }
    };
    info!(backend = cache.backend_name(), "embedding cache ready");
    Ok(cache)
}

/// Network provider when available, otherwise one that always fails
/// (queries then run with degraded embeddings)
#[cfg(feature = "openai")]
pub fn base_provider(config: &EmbeddingConfig) -> Box<dyn EmbeddingProvider> {
    match super::openai::OpenAiEmbedder::from_config(config) {
        Ok(provider) => Box::new(provider),
        Err(e) => {
            warn!(error = %e, "embedding provider unavailable");
            Box::new(UnavailableEmbedder::new(config.dimension, e.to_string()))
        }
    }
}

#[cfg(not(feature = "openai"))]
pub fn base_provider(config: &EmbeddingConfig) -> Box<dyn EmbeddingProvider> {
    warn!("built without the `openai` feature, embeddings disabled");
    Box::new(UnavailableEmbedder::new(
        config.dimension,
        "built without the `openai` feature",
    ))
}

/// Cached provider plus a handle on its cache for flushing
pub fn cached_provider(
    embedding: &EmbeddingConfig,
    cache: &CacheConfig,
) -> Result<(Box<dyn EmbeddingProvider>, Arc<dyn EmbeddingCache>), StorageError> {
    let cache = open_cache(cache)?;
    let provider = CachedEmbedder::new(base_provider(embedding), Arc::clone(&cache));
    Ok((Box::new(provider), cache))
}
