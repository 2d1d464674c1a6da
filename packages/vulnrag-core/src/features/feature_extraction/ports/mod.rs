//! Feature extraction ports
//!
//! - [`FeatureExtractionStrategy`]: source text → features
//! - [`CpgGenerator`]: source text → graph document (external toolchain)

use serde_json::Value;
use std::time::Duration;

use super::domain::{ExtractedFeatures, StrategyKind};
use super::error::{CpgGenerationError, FeatureExtractionError};

/// Extracts features directly from source text
pub trait FeatureExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn extract(&self, code: &str) -> Result<ExtractedFeatures, FeatureExtractionError>;
}

/// Produces a serialized code property graph for a source fragment
pub trait CpgGenerator: Send + Sync {
    /// Generate a graph document, giving up after `timeout`
    fn generate(&self, code: &str, timeout: Duration) -> Result<Value, CpgGenerationError>;
}
