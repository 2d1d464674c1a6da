//! Retrieval ports
//!
//! - `EmbeddingProvider`: text → dense vector (network service in production)
//! - `CpgGenerator`: source text → graph document (external toolchain)

use super::error::EmbeddingError;

pub use crate::features::feature_extraction::{CpgGenerationError, CpgGenerator};

/// Dense text embedding service
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError>;

    /// Length of every vector `embed` returns
    fn dimension(&self) -> usize;

    /// Provider name for logs
    fn name(&self) -> &str {
        "embedding"
    }

    /// Identity of the vector space: providers with equal ids return
    /// interchangeable vectors. Cache keys are scoped by it.
    fn model_id(&self) -> String {
        format!("{}/{}", self.name(), self.dimension())
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn model_id(&self) -> String {
        (**self).model_id()
    }
}
