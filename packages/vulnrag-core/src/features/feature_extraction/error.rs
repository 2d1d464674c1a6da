//! Feature extraction errors

use std::path::PathBuf;
use thiserror::Error;

/// A text strategy could not produce features
#[derive(Debug, Error)]
pub enum FeatureExtractionError {
    /// The syntax-tree grammar could not be loaded
    #[error("grammar unavailable: {0}")]
    GrammarUnavailable(String),

    /// The parser produced no tree
    #[error("syntax tree parse failed: {0}")]
    ParseFailed(String),
}

/// The external CPG toolchain failed to produce a graph document
#[derive(Debug, Error)]
pub enum CpgGenerationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("`{command}` exited with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("no graph document found in {0}")]
    NoOutput(PathBuf),

    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}
