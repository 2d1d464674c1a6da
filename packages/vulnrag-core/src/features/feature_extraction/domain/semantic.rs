//! Semantic features
//!
//! Every extraction strategy records the call, identifier and field names it
//! observes into [`NameObservations`]; the summary into [`SemanticFeatures`]
//! is shared so all strategies rank and weight names identically.

use serde::{Deserialize, Serialize};

use super::danger::{ApiPatternCounts, DangerTier, DangerousCall};
use crate::shared::constants::features::{
    COMBINED_TEXT_IDENTIFIERS, DANGEROUS_CALL_WEIGHT, TOP_CALLS, TOP_FIELD_IDENTIFIERS,
    TOP_IDENTIFIERS,
};
use crate::shared::utils::counter::FrequencyCounter;
use crate::shared::utils::math::safe_ratio;

/// Name-based features of one code fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticFeatures {
    /// Most frequent call names (≤10), ties by first occurrence
    pub top_calls: Vec<String>,
    /// Counts aligned with `top_calls`
    pub top_call_counts: Vec<usize>,
    /// Most frequent identifiers (≤15)
    pub top_identifiers: Vec<String>,
    /// Most frequent field identifiers (≤10)
    pub top_field_identifiers: Vec<String>,
    /// Lexical-channel input
    pub combined_text: String,
    /// unique_calls / total_calls
    pub call_diversity_ratio: f64,
    pub total_calls: usize,
    pub unique_calls: usize,
    /// One record per dangerous call occurrence, in order of appearance
    pub dangerous_calls: Vec<DangerousCall>,
    pub api_patterns: ApiPatternCounts,
}

impl SemanticFeatures {
    /// No calls, identifiers or text
    pub fn is_empty(&self) -> bool {
        self.total_calls == 0 && self.top_identifiers.is_empty() && self.combined_text.is_empty()
    }
}

/// Names observed in a code fragment, in order of appearance
#[derive(Debug, Clone, Default)]
pub struct NameObservations {
    calls: Vec<String>,
    identifiers: Vec<String>,
    field_identifiers: Vec<String>,
}

impl NameObservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_call(&mut self, name: impl Into<String>) {
        self.calls.push(name.into());
    }

    pub fn push_identifier(&mut self, name: impl Into<String>) {
        self.identifiers.push(name.into());
    }

    pub fn push_field_identifier(&mut self, name: impl Into<String>) {
        self.field_identifiers.push(name.into());
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Entropy of the call-name distribution
    pub fn call_entropy(&self) -> f64 {
        self.calls
            .iter()
            .map(String::as_str)
            .collect::<FrequencyCounter>()
            .entropy()
    }

    /// Rank, classify and weight the observed names
    pub fn summarize(&self) -> SemanticFeatures {
        let calls: FrequencyCounter = self.calls.iter().map(String::as_str).collect();
        let identifiers: FrequencyCounter = self.identifiers.iter().map(String::as_str).collect();
        let fields: FrequencyCounter = self.field_identifiers.iter().map(String::as_str).collect();

        let top_calls = calls.most_common(TOP_CALLS);
        let top_call_counts = top_calls.iter().map(|name| calls.count(name)).collect();
        let top_identifiers = identifiers.most_common(TOP_IDENTIFIERS);

        let dangerous_calls: Vec<DangerousCall> = self
            .calls
            .iter()
            .filter_map(|name| {
                DangerTier::classify(name).map(|tier| DangerousCall {
                    name: name.clone(),
                    tier,
                })
            })
            .collect();

        let combined_text = combined_text(&dangerous_calls, &top_calls, &top_identifiers);

        SemanticFeatures {
            call_diversity_ratio: safe_ratio(calls.distinct() as f64, calls.total() as f64),
            total_calls: calls.total(),
            unique_calls: calls.distinct(),
            top_field_identifiers: fields.most_common(TOP_FIELD_IDENTIFIERS),
            api_patterns: ApiPatternCounts::tally(self.identifiers.iter().map(String::as_str)),
            top_calls,
            top_call_counts,
            top_identifiers,
            dangerous_calls,
            combined_text,
        }
    }
}

/// Dangerous names (whole list, three times), then top calls, then the
/// first ten top identifiers, space-joined
fn combined_text(dangerous: &[DangerousCall], top_calls: &[String], top_identifiers: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for _ in 0..DANGEROUS_CALL_WEIGHT {
        parts.extend(dangerous.iter().map(|d| d.name.as_str()));
    }
    parts.extend(top_calls.iter().map(String::as_str));
    parts.extend(
        top_identifiers
            .iter()
            .take(COMBINED_TEXT_IDENTIFIERS)
            .map(String::as_str),
    );
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize_ranks_and_weights() {
        let mut obs = NameObservations::new();
        for name in ["foo", "strcpy", "foo", "bar"] {
            obs.push_call(name);
        }
        for name in ["buf", "len", "buf"] {
            obs.push_identifier(name);
        }
        obs.push_field_identifier("size");

        let s = obs.summarize();
        assert_eq!(s.top_calls, vec!["foo", "strcpy", "bar"]);
        assert_eq!(s.top_call_counts, vec![2, 1, 1]);
        assert_eq!(s.top_identifiers, vec!["buf", "len"]);
        assert_eq!(s.top_field_identifiers, vec!["size"]);
        assert_eq!(s.total_calls, 4);
        assert_eq!(s.unique_calls, 3);
        assert_eq!(s.call_diversity_ratio, 0.75);
        assert_eq!(
            s.combined_text,
            "strcpy strcpy strcpy foo strcpy bar buf len"
        );
        assert_eq!(s.dangerous_calls.len(), 1);
        assert_eq!(s.dangerous_calls[0].tier, DangerTier::Unbounded);
    }

    #[test]
    fn test_list_caps() {
        let mut obs = NameObservations::new();
        for i in 0..30 {
            obs.push_call(format!("call_{i}"));
            obs.push_identifier(format!("id_{i}"));
            obs.push_field_identifier(format!("f_{i}"));
        }
        let s = obs.summarize();
        assert_eq!(s.top_calls.len(), 10);
        assert_eq!(s.top_identifiers.len(), 15);
        assert_eq!(s.top_field_identifiers.len(), 10);
        // 10 calls + 10 identifiers
        assert_eq!(s.combined_text.split(' ').count(), 20);
    }

    #[test]
    fn test_empty() {
        let s = NameObservations::new().summarize();
        assert!(s.is_empty());
        assert_eq!(s.call_diversity_ratio, 0.0);
        assert_eq!(s.combined_text, "");
    }

    #[test]
    fn test_call_entropy() {
        let mut obs = NameObservations::new();
        obs.push_call("a");
        obs.push_call("b");
        assert_eq!(obs.call_entropy(), 1.0);
    }
}
