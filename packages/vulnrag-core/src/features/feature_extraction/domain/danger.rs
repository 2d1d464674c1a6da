//! Dangerous-call tiers and API-intent patterns

use serde::{Deserialize, Serialize};
use std::fmt;

/// Copy/format functions without a length bound
pub const UNBOUNDED_CALLS: &[&str] = &["strcpy", "strcat", "sprintf", "gets"];

/// Length-bounded variants of the unbounded functions
pub const BOUNDED_CALLS: &[&str] = &["strncpy", "strncat", "snprintf"];

/// Other raw memory and format functions
pub const MISC_CALLS: &[&str] = &["memcpy", "memmove", "scanf", "vprintf", "vfprintf"];

pub const ERROR_HANDLING_PATTERNS: &[&str] = &["error", "err", "fail", "exception"];
pub const MEMORY_MANAGEMENT_PATTERNS: &[&str] = &["ptr", "alloc", "free", "mem", "buffer"];
pub const SECURITY_CHECK_PATTERNS: &[&str] = &["check", "valid", "auth", "perm", "secure"];

/// Risk tier of a dangerous call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangerTier {
    Unbounded,
    Bounded,
    Misc,
}

impl DangerTier {
    /// Tier of `name` (exact, case-insensitive match), if dangerous
    pub fn classify(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let name = name.as_str();
        if UNBOUNDED_CALLS.contains(&name) {
            Some(Self::Unbounded)
        } else if BOUNDED_CALLS.contains(&name) {
            Some(Self::Bounded)
        } else if MISC_CALLS.contains(&name) {
            Some(Self::Misc)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unbounded => "unbounded",
            Self::Bounded => "bounded",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for DangerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of a dangerous call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerousCall {
    /// Name as written in the code
    pub name: String,
    pub tier: DangerTier,
}

/// Identifier counts per API intent (an identifier may count in several)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPatternCounts {
    pub error_handling: usize,
    pub memory_management: usize,
    pub security_checks: usize,
}

impl ApiPatternCounts {
    /// Count identifier occurrences containing any pattern of each intent
    /// (case-insensitive substring match)
    pub fn tally<'a, I>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = Self::default();
        for ident in identifiers {
            let lower = ident.to_lowercase();
            let matches = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));
            if matches(ERROR_HANDLING_PATTERNS) {
                counts.error_handling += 1;
            }
            if matches(MEMORY_MANAGEMENT_PATTERNS) {
                counts.memory_management += 1;
            }
            if matches(SECURITY_CHECK_PATTERNS) {
                counts.security_checks += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact_case_insensitive() {
        assert_eq!(DangerTier::classify("strcpy"), Some(DangerTier::Unbounded));
        assert_eq!(DangerTier::classify("STRCPY"), Some(DangerTier::Unbounded));
        assert_eq!(DangerTier::classify("strncpy"), Some(DangerTier::Bounded));
        assert_eq!(DangerTier::classify("memmove"), Some(DangerTier::Misc));
        // substring is not enough
        assert_eq!(DangerTier::classify("my_strcpy"), None);
        assert_eq!(DangerTier::classify("printf"), None);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DangerTier::Unbounded).unwrap(),
            "\"unbounded\""
        );
    }

    #[test]
    fn test_api_pattern_tally() {
        let counts = ApiPatternCounts::tally(["err", "buf_ptr", "check_perm", "i", "mem_error"]);
        assert_eq!(counts.error_handling, 2);
        assert_eq!(counts.memory_management, 2);
        assert_eq!(counts.security_checks, 1);
    }
}
