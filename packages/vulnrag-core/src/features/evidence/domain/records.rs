//! Per-match evidence records

use serde::{Deserialize, Serialize};

use crate::features::retrieval::domain::{text_or_na, value_or_na, PatternType, RetrievalResult};

/// A VULN match: the query resembles known vulnerable code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceFor {
    pub cve: String,
    pub cwe: String,
    pub vulnerability_type: String,
    pub trigger_condition: String,
    pub specific_behavior: String,
    pub preconditions: String,
    pub code_before: String,
    pub similarity: f64,
    pub pattern_type: PatternType,
}

impl From<&RetrievalResult> for EvidenceFor {
    fn from(result: &RetrievalResult) -> Self {
        let meta = &result.metadata;
        Self {
            cve: result.cve_id.clone(),
            cwe: result.cwe_id.clone(),
            vulnerability_type: text_or_na(&meta.vulnerability_type),
            trigger_condition: text_or_na(&meta.trigger_condition),
            specific_behavior: text_or_na(&meta.specific_code_behavior),
            preconditions: text_or_na(&meta.preconditions),
            code_before: text_or_na(&meta.code_before_change),
            similarity: result.hybrid_score,
            pattern_type: PatternType::Vuln,
        }
    }
}

/// A PATCH match: the query resembles fixed code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAgainst {
    pub cve: String,
    pub cwe: String,
    pub solution: String,
    pub analysis: String,
    pub modified_lines: String,
    pub code_after: String,
    pub purpose: String,
    pub similarity: f64,
    pub pattern_type: PatternType,
}

impl From<&RetrievalResult> for EvidenceAgainst {
    fn from(result: &RetrievalResult) -> Self {
        let meta = &result.metadata;
        Self {
            cve: result.cve_id.clone(),
            cwe: result.cwe_id.clone(),
            solution: text_or_na(&meta.solution),
            analysis: text_or_na(&meta.analysis),
            modified_lines: value_or_na(&meta.modified_lines),
            code_after: text_or_na(&meta.code_after_change),
            purpose: text_or_na(&meta.purpose),
            similarity: result.hybrid_score,
            pattern_type: PatternType::Patch,
        }
    }
}
