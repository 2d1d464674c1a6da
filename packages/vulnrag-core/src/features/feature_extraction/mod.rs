//! Feature Extraction
//!
//! Turns a code property graph, or raw source text when no graph is
//! available, into a fixed 12-dimension structural vector and a semantic
//! feature bundle. All strategies share one output schema.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (HybridFeatureExtractor - entry point)
//!           ↓
//! ports/ (FeatureExtractionStrategy, CpgGenerator)
//!           ↓
//! infrastructure/ (graph, syntax tree, lexical strategies)
//!           ↓
//! domain/ (StructuralFeatures, SemanticFeatures, danger tiers)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vulnrag_core::features::feature_extraction::HybridFeatureExtractor;
//!
//! let extractor = HybridFeatureExtractor::new();
//! let features = extractor.extract_query(code, None);
//! let vector = features.structural.to_vector();
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

// Re-export application layer (primary interface)
pub use application::HybridFeatureExtractor;

// Re-export domain types
pub use domain::{
    quality_score, ApiPatternCounts, DangerTier, DangerousCall, ExtractedFeatures,
    ExtractionMetadata, NameObservations, SemanticFeatures, StrategyKind, StructuralFeatures,
};

pub use error::{CpgGenerationError, FeatureExtractionError};
pub use infrastructure::{GraphFeatureExtractor, LexicalStrategy, SyntaxTreeStrategy};
pub use ports::{CpgGenerator, FeatureExtractionStrategy};
