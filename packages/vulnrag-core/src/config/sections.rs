//! Per-concern configuration sections
//!
//! Each section validates itself with range checks and hints, and provides a
//! preset constructor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::features::retrieval::FusionWeights;

// ============================================================================
// Fusion weights
// ============================================================================

/// Validate fusion weights: each in [0,1], sum within 1e-6 of 1.0.
pub fn validate_weights(weights: &FusionWeights) -> ConfigResult<()> {
    for (field, value) in [
        ("weights.structural", weights.structural),
        ("weights.lexical", weights.lexical),
        ("weights.embedding", weights.embedding),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::range_with_hint(
                field,
                value,
                0.0,
                1.0,
                "Each similarity channel weight is a fraction of the fused score",
            ));
        }
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(ConfigError::WeightSum {
            sum,
            structural: weights.structural,
            lexical: weights.lexical,
            embedding: weights.embedding,
        });
    }
    Ok(())
}

// ============================================================================
// Embedding provider
// ============================================================================

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Vector dimension (1..=16384); must match the index artifacts
    pub dimension: usize,

    /// Model name sent to the provider
    pub model: String,

    /// Provider base URL (without `/v1/embeddings`)
    pub base_url: String,

    /// Request timeout in seconds (1..=600)
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dimension < 1 || self.dimension > 16_384 {
            return Err(ConfigError::range_with_hint(
                "embedding.dimension",
                self.dimension,
                1,
                16_384,
                "Dimension must match the embedding matrices in the index directory",
            ));
        }
        if self.timeout_secs < 1 || self.timeout_secs > 600 {
            return Err(ConfigError::range_with_hint(
                "embedding.timeout_secs",
                self.timeout_secs,
                1,
                600,
                "Embedding requests block the query",
            ));
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 1536,
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout_secs: 30,
        }
    }
}

// ============================================================================
// CPG generation
// ============================================================================

/// External CPG generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpgConfig {
    /// Generate a CPG for query code before falling back to text extraction
    pub enabled: bool,

    /// Parser executable
    pub parse_command: String,

    /// Exporter executable
    pub export_command: String,

    /// Per-command timeout in seconds (1..=3600)
    pub timeout_secs: u64,
}

impl CpgConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs < 1 || self.timeout_secs > 3600 {
            return Err(ConfigError::range_with_hint(
                "cpg.timeout_secs",
                self.timeout_secs,
                1,
                3600,
                "CPG generation is bounded by this timeout and never retried",
            ));
        }
        if self.enabled && (self.parse_command.is_empty() || self.export_command.is_empty()) {
            return Err(ConfigError::missing_field(
                "cpg.parse_command / cpg.export_command",
                "Both commands are required when CPG generation is enabled",
            ));
        }
        Ok(())
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self {
            enabled: matches!(preset, Preset::Thorough),
            ..Self::default()
        }
    }
}

impl Default for CpgConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            parse_command: "joern-parse".to_string(),
            export_command: "joern-export".to_string(),
            timeout_secs: 30,
        }
    }
}

// ============================================================================
// Embedding cache
// ============================================================================

/// Embedding cache backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Json,
    Sqlite,
}

/// Embedding cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// Cache file (required for `json` and `sqlite`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Puts between JSON flushes (1..=100000)
    pub flush_every: usize,
}

impl CacheConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.flush_every < 1 || self.flush_every > 100_000 {
            return Err(ConfigError::range_with_hint(
                "cache.flush_every",
                self.flush_every,
                1,
                100_000,
                "Number of buffered writes before the cache file is rewritten",
            ));
        }
        if self.backend != CacheBackend::Memory && self.path.is_none() {
            return Err(ConfigError::missing_field(
                "cache.path",
                "Persistent cache backends need a file path",
            ));
        }
        Ok(())
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self::default(),
            Preset::Balanced => Self {
                backend: CacheBackend::Json,
                path: Some(PathBuf::from(".vulnrag/embedding_cache.json")),
                flush_every: 16,
            },
            Preset::Thorough => Self {
                backend: CacheBackend::Sqlite,
                path: Some(PathBuf::from(".vulnrag/embedding_cache.db")),
                flush_every: 1,
            },
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            path: None,
            flush_every: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(validate_weights(&FusionWeights::default()).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = FusionWeights {
            structural: 0.5,
            lexical: 0.3,
            embedding: 0.3,
        };
        assert!(matches!(
            validate_weights(&weights),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = FusionWeights {
            structural: 1.2,
            lexical: -0.2,
            embedding: 0.0,
        };
        assert!(matches!(
            validate_weights(&weights),
            Err(ConfigError::Range { .. })
        ));
    }

    #[test]
    fn test_persistent_cache_requires_path() {
        let cache = CacheConfig {
            backend: CacheBackend::Sqlite,
            path: None,
            flush_every: 1,
        };
        assert!(matches!(
            cache.validate(),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(CacheConfig::from_preset(Preset::Thorough).validate().is_ok());
    }

    #[test]
    fn test_embedding_dimension_range() {
        let config = EmbeddingConfig {
            dimension: 0,
            ..EmbeddingConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(EmbeddingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cpg_preset() {
        assert!(!CpgConfig::from_preset(Preset::Fast).enabled);
        assert!(!CpgConfig::from_preset(Preset::Balanced).enabled);
        assert!(CpgConfig::from_preset(Preset::Thorough).enabled);
    }
}
