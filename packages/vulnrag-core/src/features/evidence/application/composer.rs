//! EvidenceComposer - match lists → evidence bundle

use serde::{Deserialize, Serialize};

use crate::features::evidence::domain::{
    ConfidenceLevel, DifferentialAnalysis, EvidenceAgainst, EvidenceFor, Recommendation,
    SecurityDifference,
};
use crate::features::retrieval::domain::{best_result, RetrievalResult};
use crate::shared::constants::evidence::HIGH_SIMILARITY;

/// Evidence for both verdicts plus the differential summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    pub evidence_for: Vec<EvidenceFor>,
    pub evidence_against: Vec<EvidenceAgainst>,
    pub differential_analysis: DifferentialAnalysis,
}

/// Stateless; output depends only on the two result lists
#[derive(Debug, Clone, Copy, Default)]
pub struct EvidenceComposer;

impl EvidenceComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, vuln: &[RetrievalResult], patch: &[RetrievalResult]) -> EvidenceBundle {
        EvidenceBundle {
            evidence_for: vuln.iter().map(EvidenceFor::from).collect(),
            evidence_against: patch.iter().map(EvidenceAgainst::from).collect(),
            differential_analysis: self.differential(vuln, patch),
        }
    }

    pub fn differential(
        &self,
        vuln: &[RetrievalResult],
        patch: &[RetrievalResult],
    ) -> DifferentialAnalysis {
        let (Some(best_vuln), Some(best_patch)) = (best_result(vuln), best_result(patch)) else {
            return DifferentialAnalysis::InsufficientData;
        };

        let same_cve_pair = best_vuln.cve_id == best_patch.cve_id;
        let score_differential = (best_vuln.hybrid_score - best_patch.hybrid_score).abs();
        let average_similarity = (best_vuln.hybrid_score + best_patch.hybrid_score) / 2.0;

        let solution = best_patch.metadata.solution.as_deref().unwrap_or_default();
        let trigger = best_vuln
            .metadata
            .trigger_condition
            .as_deref()
            .unwrap_or_default();

        DifferentialAnalysis::Analyzed {
            same_cve_pair,
            score_differential,
            average_similarity,
            high_similarity_both: average_similarity > HIGH_SIMILARITY,
            confidence_level: ConfidenceLevel::from_differential(score_differential),
            security_critical_differences: SecurityDifference::detect(solution, trigger),
            recommendation: Recommendation::from_scores(
                score_differential,
                average_similarity,
                same_cve_pair,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::retrieval::domain::{PatternType, VulnerabilityMetadata};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn result(cve: &str, score: f64, pattern_type: PatternType) -> RetrievalResult {
        RetrievalResult {
            entry_id: format!("{cve}-{pattern_type}"),
            instance_id: None,
            hybrid_score: score,
            structural_score: score,
            tfidf_score: score,
            embedding_score: score,
            cve_id: cve.into(),
            cwe_id: "CWE-476".into(),
            pattern_type,
            metadata: VulnerabilityMetadata::default(),
        }
    }

    #[test]
    fn test_empty_side_is_insufficient() {
        let composer = EvidenceComposer::new();
        let bundle = composer.build(&[result("CVE-1", 0.8, PatternType::Vuln)], &[]);
        assert_eq!(bundle.evidence_for.len(), 1);
        assert!(bundle.evidence_against.is_empty());
        assert_eq!(bundle.differential_analysis, DifferentialAnalysis::InsufficientData);
    }

    #[test]
    fn test_same_cve_pair_high_similarity() {
        let vuln = [result("CVE-2020-1", 0.92, PatternType::Vuln)];
        let mut patch = result("CVE-2020-1", 0.95, PatternType::Patch);
        patch.metadata.solution = Some("Add a NULL check before dereferencing".into());

        let analysis = EvidenceComposer::new().differential(&vuln, &[patch]);
        match analysis {
            DifferentialAnalysis::Analyzed {
                same_cve_pair,
                score_differential,
                high_similarity_both,
                confidence_level,
                security_critical_differences,
                recommendation,
                ..
            } => {
                assert!(same_cve_pair);
                assert!((score_differential - 0.03).abs() < 1e-9);
                assert!(high_similarity_both);
                assert_eq!(confidence_level, ConfidenceLevel::Low);
                assert_eq!(
                    security_critical_differences,
                    vec![SecurityDifference::NullPointerValidation]
                );
                assert_eq!(recommendation, Recommendation::SameCvePair);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_absent_fields_render_na() {
        let mut patch = result("CVE-3", 0.4, PatternType::Patch);
        patch.metadata.modified_lines = Some(json!({"added": [12]}));
        let bundle = EvidenceComposer::new().build(&[], &[patch]);
        let against = &bundle.evidence_against[0];
        assert_eq!(against.solution, "N/A");
        assert_eq!(against.modified_lines, r#"{"added":[12]}"#);
        assert_eq!(against.pattern_type, PatternType::Patch);
    }

    #[test]
    fn test_build_is_deterministic() {
        let vuln = [
            result("CVE-1", 0.3, PatternType::Vuln),
            result("CVE-2", 0.7, PatternType::Vuln),
        ];
        let patch = [result("CVE-2", 0.6, PatternType::Patch)];
        let composer = EvidenceComposer::new();
        assert_eq!(composer.build(&vuln, &patch), composer.build(&vuln, &patch));
    }
}
