//! Retrieval engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, ConfigOverrides};
use super::preset::Preset;
use super::sections::{validate_weights, CacheConfig, CpgConfig, EmbeddingConfig};
use crate::features::retrieval::FusionWeights;

/// Complete configuration for index loading and query execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Preset the configuration was derived from
    pub preset: Preset,

    /// Directory holding the index artifacts
    pub artifacts_dir: PathBuf,

    /// Results per index (1..=1000)
    pub top_k: usize,

    /// Fusion weights for the structural/lexical/embedding channels
    pub weights: FusionWeights,

    pub embedding: EmbeddingConfig,

    pub cpg: CpgConfig,

    pub cache: CacheConfig,
}

impl RetrievalConfig {
    /// Build the configuration for a preset
    pub fn preset(preset: Preset) -> Self {
        let top_k = match preset {
            Preset::Fast => 5,
            Preset::Balanced => 10,
            Preset::Thorough => 20,
        };
        Self {
            preset,
            artifacts_dir: PathBuf::from("data/index"),
            top_k,
            weights: FusionWeights::default(),
            embedding: EmbeddingConfig::default(),
            cpg: CpgConfig::from_preset(preset),
            cache: CacheConfig::from_preset(preset),
        }
    }

    /// Validate all sections
    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_k < 1 || self.top_k > 1000 {
            return Err(ConfigError::range_with_hint(
                "top_k",
                self.top_k,
                1,
                1000,
                "Number of results returned per index",
            ));
        }
        validate_weights(&self.weights)?;
        self.embedding.validate()?;
        self.cpg.validate()?;
        self.cache.validate()?;
        Ok(())
    }

    /// Apply YAML overrides on top of this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.artifacts_dir {
            self.artifacts_dir = dir;
        }
        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }
        if let Some(weights) = overrides.weights {
            self.weights = weights;
        }
        if let Some(embedding) = overrides.embedding {
            self.embedding = embedding;
        }
        if let Some(cpg) = overrides.cpg {
            self.cpg = cpg;
        }
        if let Some(cache) = overrides.cache {
            self.cache = cache;
        }
    }

    /// Load and validate a YAML v1 configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let export: ConfigExportV1 = serde_yaml::from_str(&content)?;

        // Version check
        match export.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match export.preset.as_deref() {
            Some(name) => {
                Preset::from_str(name).map_err(|_| ConfigError::UnknownPreset(name.to_string()))?
            }
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            config.apply(overrides);
        }
        config.validate()?;

        debug!(path = %path.display(), preset = %preset, "loaded retrieval configuration");
        Ok(config)
    }

    /// Export as YAML v1 (every section written as an override)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: Some(self.preset.as_str().to_string()),
            overrides: Some(ConfigOverrides {
                artifacts_dir: Some(self.artifacts_dir.clone()),
                top_k: Some(self.top_k),
                weights: Some(self.weights),
                embedding: Some(self.embedding.clone()),
                cpg: Some(self.cpg.clone()),
                cache: Some(self.cache.clone()),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}
