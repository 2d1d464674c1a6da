//! Centralized constants
//!
//! Label names follow the Joern CPG schema. Thresholds and list sizes are
//! part of the index format: changing them changes the feature vectors, so
//! indexes must be rebuilt.

/// Vertex and edge labels
pub mod labels {
    pub const UNKNOWN: &str = "UNKNOWN";

    pub const METHOD: &str = "METHOD";
    pub const CALL: &str = "CALL";
    pub const IDENTIFIER: &str = "IDENTIFIER";
    pub const FIELD_IDENTIFIER: &str = "FIELD_IDENTIFIER";
    pub const CONTROL_STRUCTURE: &str = "CONTROL_STRUCTURE";
    pub const BLOCK: &str = "BLOCK";

    pub const AST: &str = "AST";
    pub const CFG: &str = "CFG";
    pub const CDG: &str = "CDG";
    pub const REACHING_DEF: &str = "REACHING_DEF";

    /// Vertex labels a complete C/C++ CPG is expected to contain
    pub const EXPECTED_VERTEX_LABELS: &[&str] = &[
        "METHOD",
        "CALL",
        "IDENTIFIER",
        "LITERAL",
        "CONTROL_STRUCTURE",
        "LOCAL",
        "BLOCK",
        "METHOD_PARAMETER_IN",
        "METHOD_PARAMETER_OUT",
        "METHOD_RETURN",
        "TYPE",
        "FILE",
        "BINDING",
        "NAMESPACE",
    ];

    /// Edge labels a complete C/C++ CPG is expected to contain
    pub const EXPECTED_EDGE_LABELS: &[&str] = &[
        "AST",
        "CFG",
        "CDG",
        "DDG",
        "REACHING_DEF",
        "CALL",
        "ARGUMENT",
        "RECEIVER",
        "EVAL_TYPE",
        "CONTAINS",
        "REF",
        "DOMINATE",
        "PDG",
    ];
}

/// Property keys
pub mod properties {
    pub const NAME: &str = "NAME";
    pub const FULL_NAME: &str = "FULL_NAME";
    pub const CODE: &str = "CODE";
    pub const CONTROL_STRUCTURE_TYPE: &str = "CONTROL_STRUCTURE_TYPE";
}

/// Graph document parsing
pub mod graph {
    /// Maximum number of `{"@value": ...}` envelopes peeled from a property
    pub const MAX_ENVELOPE_DEPTH: usize = 3;

    /// UNKNOWN-labeled share above which a graph is flat (strictly greater)
    pub const FLAT_UNKNOWN_RATIO: f64 = 0.8;
}

/// Feature extraction
pub mod features {
    /// Number of structural dimensions in the retrieval vector
    pub const STRUCTURAL_DIMENSIONS: usize = 12;

    /// Top call names kept in semantic features
    pub const TOP_CALLS: usize = 10;

    /// Top identifiers kept in semantic features
    pub const TOP_IDENTIFIERS: usize = 15;

    /// Top field identifiers kept in semantic features
    pub const TOP_FIELD_IDENTIFIERS: usize = 10;

    /// Top identifiers copied into the combined text
    pub const COMBINED_TEXT_IDENTIFIERS: usize = 10;

    /// Repetitions of dangerous-call names in the combined text
    pub const DANGEROUS_CALL_WEIGHT: usize = 3;

    /// Upper bound of the graph-driven nesting-depth estimate
    pub const MAX_NESTING_ESTIMATE: f64 = 10.0;

    /// Quality score contributions
    pub const STRUCTURAL_QUALITY: f64 = 0.6;
    pub const SEMANTIC_QUALITY: f64 = 0.4;
}

/// Retrieval
pub mod retrieval {
    /// Score range below which a similarity channel is treated as constant
    pub const NORMALIZATION_EPSILON: f64 = 1e-8;

    pub const DEFAULT_STRUCTURAL_WEIGHT: f64 = 0.4;
    pub const DEFAULT_LEXICAL_WEIGHT: f64 = 0.3;
    pub const DEFAULT_EMBEDDING_WEIGHT: f64 = 0.3;

    /// Placeholder for absent metadata fields in evidence records
    pub const NOT_AVAILABLE: &str = "N/A";
}

pub mod evidence {
    /// Average best-match score above which both matches count as highly similar
    pub const HIGH_SIMILARITY: f64 = 0.9;
    pub const VERY_HIGH_SIMILARITY: f64 = 0.95;
    pub const VERY_HIGH_MAX_DIFF: f64 = 0.05;
    pub const SAME_CVE_MAX_DIFF: f64 = 0.1;

    /// Score differential thresholds: low < MEDIUM ≤ medium < HIGH ≤ high
    pub const CONFIDENCE_MEDIUM_DIFF: f64 = 0.05;
    pub const CONFIDENCE_HIGH_DIFF: f64 = 0.15;
}
