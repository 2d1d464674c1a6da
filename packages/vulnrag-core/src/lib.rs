/*
 * Vulnrag Core - CPG-based Vulnerability Retrieval
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Constants and math helpers
 * - features/    : Vertical slices (graph_parsing → feature_extraction → retrieval → evidence)
 * - config/      : Presets + YAML v1 configuration
 * - errors       : Crate-level error aggregation
 *
 * Performance:
 * - Immutable indexes shared across concurrent queries
 * - Rayon work-stealing for corpus-wide batches
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Index assembly takes every artifact
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::upper_case_acronyms)] // CPG, CWE naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared constants and utilities
pub mod shared;

/// Feature modules (parsing → features → retrieval → evidence)
pub mod features;

/// Configuration system (presets + YAML)
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{Preset, RetrievalConfig};
pub use errors::{Result, VulnragError};

pub use features::evidence::{DifferentialAnalysis, EvidenceComposer};
pub use features::feature_extraction::{ExtractedFeatures, HybridFeatureExtractor};
pub use features::graph_parsing::{GraphParser, PropertyGraph};
pub use features::retrieval::{
    EmbeddingProvider, FusionWeights, HybridRetriever, IndexBuilder, PatternType,
    RetrievalResultSet,
};
pub use features::signature::{Signature, SignatureBatch, SignatureExtractor};
