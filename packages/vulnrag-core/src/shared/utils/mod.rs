//! Utility modules shared across features
//!
//! - `math`: ratios, entropy, normalization and cosine similarity
//! - `counter`: insertion-ordered frequency counting
//! - `csv`: RFC 4180 field quoting
//! - `tree_sitter`: AST traversal and text extraction

pub mod counter;
pub mod csv;
pub mod math;
pub mod tree_sitter;

// Re-exports for convenience
pub use counter::FrequencyCounter;
pub use math::{cosine_similarity, min_max_normalize, safe_ratio, shannon_entropy};
