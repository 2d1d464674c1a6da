//! Vulnerability provenance attached to index entries

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::shared::constants::retrieval::NOT_AVAILABLE;

/// Free-form description of a vulnerability and its fix.
///
/// Known fields are typed; anything else in the corpus record is kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_condition: Option<String>,

    #[serde(
        default,
        alias = "specific_code_behavior_causing_vulnerability",
        skip_serializing_if = "Option::is_none"
    )]
    pub specific_code_behavior: Option<String>,

    #[serde(
        default,
        alias = "preconditions_for_vulnerability",
        skip_serializing_if = "Option::is_none"
    )]
    pub preconditions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_before_change: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,

    #[serde(default, alias = "GPT_analysis", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Line list or diff text, shape varies by corpus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_lines: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_after_change: Option<String>,

    #[serde(default, alias = "gpt_purpose", skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Text of an optional field, `"N/A"` when absent or blank
pub fn text_or_na(field: &Option<String>) -> String {
    match field.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render an arbitrary JSON field as text, `"N/A"` when absent or null
pub fn value_or_na(field: &Option<Value>) -> String {
    match field {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_field_names() {
        let meta: VulnerabilityMetadata = serde_json::from_value(json!({
            "specific_code_behavior_causing_vulnerability": "copies without length check",
            "GPT_analysis": "adds a bound",
            "gpt_purpose": "prevent overflow",
            "reviewer": "kb2"
        }))
        .unwrap();
        assert_eq!(meta.specific_code_behavior.as_deref(), Some("copies without length check"));
        assert_eq!(meta.analysis.as_deref(), Some("adds a bound"));
        assert_eq!(meta.purpose.as_deref(), Some("prevent overflow"));
        assert_eq!(meta.extra["reviewer"], json!("kb2"));
    }

    #[test]
    fn test_na_rendering() {
        assert_eq!(text_or_na(&None), "N/A");
        assert_eq!(text_or_na(&Some("  ".into())), "N/A");
        assert_eq!(text_or_na(&Some("x".into())), "x");
        assert_eq!(value_or_na(&Some(json!([3, 4]))), "[3,4]");
        assert_eq!(value_or_na(&Some(Value::Null)), "N/A");
    }
}
