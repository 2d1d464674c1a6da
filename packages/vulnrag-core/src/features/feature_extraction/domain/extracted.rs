//! Extraction output

use serde::{Deserialize, Serialize};
use std::fmt;

use super::semantic::SemanticFeatures;
use super::structural::StructuralFeatures;
use crate::shared::constants::features::{SEMANTIC_QUALITY, STRUCTURAL_QUALITY};

/// Which strategy produced a feature set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Code property graph
    Graph,
    /// tree-sitter C syntax tree
    SyntaxTree,
    /// Regex scan of the source text
    Lexical,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::SyntaxTree => "syntax_tree",
            Self::Lexical => "lexical",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub strategy: StrategyKind,
    /// 0.6 for non-empty structure + 0.4 for any semantic content
    pub quality_score: f64,
    /// Source graph was mostly `UNKNOWN` vertices
    pub is_flat: bool,
}

/// Structural and semantic features with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    pub structural: StructuralFeatures,
    pub semantic: SemanticFeatures,
    pub metadata: ExtractionMetadata,
}

impl ExtractedFeatures {
    pub fn new(
        structural: StructuralFeatures,
        semantic: SemanticFeatures,
        strategy: StrategyKind,
        is_flat: bool,
    ) -> Self {
        let quality_score = quality_score(&structural, &semantic);
        Self {
            structural,
            semantic,
            metadata: ExtractionMetadata {
                strategy,
                quality_score,
                is_flat,
            },
        }
    }
}

/// 0.6·[node_count > 0] + 0.4·[any calls, identifiers or combined text]
pub fn quality_score(structural: &StructuralFeatures, semantic: &SemanticFeatures) -> f64 {
    let mut score = 0.0;
    if structural.node_count > 0 {
        score += STRUCTURAL_QUALITY;
    }
    if !semantic.is_empty() {
        score += SEMANTIC_QUALITY;
    }
    score
}
