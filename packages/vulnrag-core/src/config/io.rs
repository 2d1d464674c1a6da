//! Configuration I/O (YAML)
//!
//! Defines the versioned YAML schema. Loading and export live in
//! retrieval_config.rs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::sections::{CacheConfig, CpgConfig, EmbeddingConfig};
use crate::features::retrieval::FusionWeights;

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default)]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<FusionWeights>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpg: Option<CpgConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
}
