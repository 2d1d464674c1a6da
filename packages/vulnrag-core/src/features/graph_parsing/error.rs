//! Graph document errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphParseError {
    #[error("failed to read graph document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not a `tinker:graph` with vertex and edge collections
    #[error("invalid graph document: {0}")]
    InvalidShape(String),
}

impl GraphParseError {
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape(reason.into())
    }
}
