//! Retrieval and embedding errors

use std::path::PathBuf;
use thiserror::Error;

/// Index loading, building or search failure
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// A required index artifact does not exist
    #[error("missing index artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// An artifact exists but is unreadable or disagrees with its siblings
    #[error("corrupt index artifact {}: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corpus file rejected by the index builder
    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RetrievalError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Embedding provider failure
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// No provider is configured (e.g. built without the `openai` feature)
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("embedding service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
