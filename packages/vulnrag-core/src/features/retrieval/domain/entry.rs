//! Index entries and query features

use serde::{Deserialize, Serialize};

use super::metadata::VulnerabilityMetadata;
use super::pattern::PatternType;
use crate::features::feature_extraction::{
    ExtractedFeatures, SemanticFeatures, StrategyKind, StructuralFeatures,
};
use crate::shared::constants::features::STRUCTURAL_DIMENSIONS;

/// One corpus item in one of the two indexes; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub entry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub cve_id: String,
    pub cwe_id: String,
    pub pattern_type: PatternType,
    pub structural_features: StructuralFeatures,
    pub semantic_features: SemanticFeatures,
    #[serde(default)]
    pub vulnerability_metadata: VulnerabilityMetadata,
}

/// Query-side features, extracted once and searched against both indexes
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFeatures {
    /// Unscaled retrieval vector
    pub structural: [f64; STRUCTURAL_DIMENSIONS],
    /// TF-IDF input
    pub combined_text: String,
    pub embedding: Vec<f64>,
    pub strategy: StrategyKind,
    pub quality_score: f64,
    pub is_flat: bool,
    /// The embedding is a zero vector standing in for a failed provider call
    pub embedding_degraded: bool,
}

impl QueryFeatures {
    pub fn new(features: &ExtractedFeatures, embedding: Vec<f64>, embedding_degraded: bool) -> Self {
        Self {
            structural: features.structural.to_vector(),
            combined_text: features.semantic.combined_text.clone(),
            embedding,
            strategy: features.metadata.strategy,
            quality_score: features.metadata.quality_score,
            is_flat: features.metadata.is_flat,
            embedding_degraded,
        }
    }
}
