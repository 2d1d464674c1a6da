//! Shared module - Common types and utilities
//!
//! Constants and helpers used by more than one feature.

pub mod constants;
pub mod utils;

// Re-exports for convenience
pub use utils::{cosine_similarity, min_max_normalize, safe_ratio, shannon_entropy, FrequencyCounter};
