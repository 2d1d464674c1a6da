//! Error types for vulnrag-core
//!
//! Each feature owns its error enum; this module aggregates them for callers
//! that drive several features at once (the CLI, the index builder).

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::feature_extraction::FeatureExtractionError;
use crate::features::graph_parsing::GraphParseError;
use crate::features::retrieval::{CpgGenerationError, EmbeddingError, RetrievalError};

/// Main error type for vulnrag-core operations
#[derive(Debug, Error)]
pub enum VulnragError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Graph document could not be parsed
    #[error("Graph parse error: {0}")]
    GraphParse(#[from] GraphParseError),

    /// Text feature extraction failure
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(#[from] FeatureExtractionError),

    /// Index loading, building or search error
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Embedding provider failure
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// CPG generation failure
    #[error("CPG generation error: {0}")]
    CpgGeneration(#[from] CpgGenerationError),

    /// Embedding cache failure
    #[error("Storage error: {0}")]
    Storage(#[from] vulnrag_storage::StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid input supplied by a caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VulnragError {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        VulnragError::InvalidInput(msg.into())
    }
}

/// Result type alias for vulnrag operations
pub type Result<T> = std::result::Result<T, VulnragError>;
