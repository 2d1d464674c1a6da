//! Retrieval results

use serde::{Deserialize, Serialize};

use super::fusion::FusionWeights;
use super::metadata::VulnerabilityMetadata;
use super::pattern::PatternType;
use crate::features::evidence::{DifferentialAnalysis, EvidenceAgainst, EvidenceFor};
use crate::features::feature_extraction::StrategyKind;

/// One ranked match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub entry_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Fused score in [0,1]
    pub hybrid_score: f64,
    /// Raw cosine scores, before normalization
    pub structural_score: f64,
    pub tfidf_score: f64,
    pub embedding_score: f64,
    pub cve_id: String,
    pub cwe_id: String,
    pub pattern_type: PatternType,
    pub metadata: VulnerabilityMetadata,
}

/// How a result set was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    pub search_time_ms: f64,
    pub total_vuln_patterns: usize,
    pub total_patch_patterns: usize,
    pub weights: FusionWeights,
    pub query_strategy: StrategyKind,
    pub query_quality_score: f64,
    pub query_is_flat: bool,
    pub embedding_degraded: bool,
}

/// Complete answer to one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResultSet {
    pub query_id: String,
    /// Both indexes merged, hybrid_score descending
    pub results: Vec<RetrievalResult>,
    pub best_vuln_score: f64,
    pub best_patch_score: f64,
    pub evidence_for: Vec<EvidenceFor>,
    pub evidence_against: Vec<EvidenceAgainst>,
    pub differential_analysis: DifferentialAnalysis,
    pub retrieval_metadata: RetrievalMetadata,
}

impl RetrievalResultSet {
    pub fn results_of(&self, pattern_type: PatternType) -> impl Iterator<Item = &RetrievalResult> {
        self.results
            .iter()
            .filter(move |r| r.pattern_type == pattern_type)
    }
}

/// Highest fused score, 0.0 for no results
pub fn best_score(results: &[RetrievalResult]) -> f64 {
    results
        .iter()
        .map(|r| r.hybrid_score)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
        .unwrap_or(0.0)
}

/// First result with the highest fused score
pub fn best_result(results: &[RetrievalResult]) -> Option<&RetrievalResult> {
    results.iter().fold(None, |best, r| match best {
        Some(b) if b.hybrid_score >= r.hybrid_score => Some(b),
        _ => Some(r),
    })
}
