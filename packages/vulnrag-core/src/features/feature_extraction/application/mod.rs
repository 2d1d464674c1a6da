//! Feature extraction application layer

pub mod hybrid_extractor;

pub use hybrid_extractor::HybridFeatureExtractor;
