//! Differential analysis of the best VULN and PATCH matches

use serde::{Deserialize, Serialize};

use crate::shared::constants::evidence::{
    CONFIDENCE_HIGH_DIFF, CONFIDENCE_MEDIUM_DIFF, HIGH_SIMILARITY, SAME_CVE_MAX_DIFF,
    VERY_HIGH_MAX_DIFF, VERY_HIGH_SIMILARITY,
};

/// How far apart the best VULN and PATCH scores are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// low < 0.05 ≤ medium < 0.15 ≤ high
    pub fn from_differential(score_differential: f64) -> Self {
        if score_differential < CONFIDENCE_MEDIUM_DIFF {
            Self::Low
        } else if score_differential < CONFIDENCE_HIGH_DIFF {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Guidance tag for the downstream analyst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    VeryHighSimilarity,
    SameCvePair,
    HighSimilarity,
    ModerateSimilarity,
}

impl Recommendation {
    /// First matching rule wins
    pub fn from_scores(score_differential: f64, average_similarity: f64, same_cve_pair: bool) -> Self {
        if average_similarity > VERY_HIGH_SIMILARITY && score_differential < VERY_HIGH_MAX_DIFF {
            Self::VeryHighSimilarity
        } else if same_cve_pair && score_differential < SAME_CVE_MAX_DIFF {
            Self::SameCvePair
        } else if average_similarity > HIGH_SIMILARITY {
            Self::HighSimilarity
        } else {
            Self::ModerateSimilarity
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryHighSimilarity => {
                "Focus on subtle differences, be skeptical of vulnerability claims"
            }
            Self::SameCvePair => {
                "Likely comparing vulnerable code to its patch, examine specific fix details"
            }
            Self::HighSimilarity => "Common code patterns, look for security-critical differences",
            Self::ModerateSimilarity => "Standard analysis appropriate",
        }
    }
}

/// A security-relevant change suggested by the patch solution text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityDifference {
    #[serde(rename = "Input validation added in patch")]
    InputValidation,
    #[serde(rename = "Bounds checking introduced")]
    BoundsChecking,
    #[serde(rename = "Null pointer validation added")]
    NullPointerValidation,
    #[serde(rename = "Synchronization mechanism added")]
    Synchronization,
    #[serde(rename = "Memory management improved")]
    MemoryManagement,
}

impl SecurityDifference {
    pub const ALL: [SecurityDifference; 5] = [
        SecurityDifference::InputValidation,
        SecurityDifference::BoundsChecking,
        SecurityDifference::NullPointerValidation,
        SecurityDifference::Synchronization,
        SecurityDifference::MemoryManagement,
    ];

    /// Keyword groups; the last group requires every keyword, the others any
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::InputValidation => &["validation"],
            Self::BoundsChecking => &["bounds check", "range check"],
            Self::NullPointerValidation => &["null check", "null ptr"],
            Self::Synchronization => &["lock", "mutex"],
            Self::MemoryManagement => &["free", "after"],
        }
    }

    fn mentioned_in(&self, text: &str) -> bool {
        let keywords = self.keywords();
        match self {
            Self::MemoryManagement => keywords.iter().all(|k| text.contains(k)),
            _ => keywords.iter().any(|k| text.contains(k)),
        }
    }

    /// Present in the patch solution and absent from the vulnerable trigger.
    ///
    /// Both inputs are compared case-insensitively.
    pub fn detect(patch_solution: &str, vuln_trigger: &str) -> Vec<SecurityDifference> {
        let solution = patch_solution.to_lowercase();
        let trigger = vuln_trigger.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|d| d.mentioned_in(&solution) && !d.mentioned_in(&trigger))
            .collect()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InputValidation => "Input validation added in patch",
            Self::BoundsChecking => "Bounds checking introduced",
            Self::NullPointerValidation => "Null pointer validation added",
            Self::Synchronization => "Synchronization mechanism added",
            Self::MemoryManagement => "Memory management improved",
        }
    }
}

/// Summary of the two best matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DifferentialAnalysis {
    /// One of the indexes returned nothing
    InsufficientData,
    Analyzed {
        same_cve_pair: bool,
        score_differential: f64,
        average_similarity: f64,
        high_similarity_both: bool,
        confidence_level: ConfidenceLevel,
        security_critical_differences: Vec<SecurityDifference>,
        recommendation: Recommendation,
    },
}

impl DifferentialAnalysis {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, Self::Analyzed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(ConfidenceLevel::from_differential(0.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_differential(0.05), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_differential(0.149), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_differential(0.15), ConfidenceLevel::High);
    }

    #[test]
    fn test_recommendation_order() {
        assert_eq!(
            Recommendation::from_scores(0.01, 0.97, true),
            Recommendation::VeryHighSimilarity
        );
        assert_eq!(
            Recommendation::from_scores(0.03, 0.935, true),
            Recommendation::SameCvePair
        );
        assert_eq!(
            Recommendation::from_scores(0.2, 0.91, true),
            Recommendation::HighSimilarity
        );
        assert_eq!(
            Recommendation::from_scores(0.2, 0.5, false),
            Recommendation::ModerateSimilarity
        );
    }

    #[test]
    fn test_detect_differences() {
        let found = SecurityDifference::detect(
            "Add a bounds check and take the MUTEX before use; avoid use after FREE",
            "missing validation of length",
        );
        assert_eq!(
            found,
            vec![
                SecurityDifference::BoundsChecking,
                SecurityDifference::Synchronization,
                SecurityDifference::MemoryManagement,
            ]
        );
        assert!(SecurityDifference::detect("free the buffer", "").is_empty());
    }

    #[test]
    fn test_serialized_shapes() {
        let analysis = DifferentialAnalysis::Analyzed {
            same_cve_pair: true,
            score_differential: 0.03,
            average_similarity: 0.935,
            high_similarity_both: true,
            confidence_level: ConfidenceLevel::Low,
            security_critical_differences: vec![SecurityDifference::NullPointerValidation],
            recommendation: Recommendation::SameCvePair,
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["status"], json!("analyzed"));
        assert_eq!(value["confidence_level"], json!("low"));
        assert_eq!(value["recommendation"], json!("SAME_CVE_PAIR"));
        assert_eq!(
            value["security_critical_differences"],
            json!(["Null pointer validation added"])
        );
        assert_eq!(
            serde_json::to_value(DifferentialAnalysis::InsufficientData).unwrap(),
            json!({"status": "insufficient_data"})
        );
    }
}
