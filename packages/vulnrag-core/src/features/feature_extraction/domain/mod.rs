//! Feature Extraction Domain Models
//!
//! ```text
//! domain/
//! ├── structural.rs  # StructuralFeatures, retrieval vector
//! ├── semantic.rs    # SemanticFeatures, NameObservations
//! ├── danger.rs      # Dangerous-call tiers, API-intent patterns
//! └── extracted.rs   # ExtractedFeatures, metadata, quality score
//! ```

pub mod danger;
pub mod extracted;
pub mod semantic;
pub mod structural;

// Re-exports for convenience
pub use danger::{ApiPatternCounts, DangerTier, DangerousCall};
pub use extracted::{quality_score, ExtractedFeatures, ExtractionMetadata, StrategyKind};
pub use semantic::{NameObservations, SemanticFeatures};
pub use structural::StructuralFeatures;
