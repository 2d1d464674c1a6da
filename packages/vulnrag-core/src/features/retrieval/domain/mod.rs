//! Retrieval domain: entries, results and score fusion

pub mod entry;
pub mod fusion;
pub mod metadata;
pub mod pattern;
pub mod result;

pub use entry::{IndexEntry, QueryFeatures};
pub use fusion::{ChannelScores, FusionWeights, RankedHit};
pub use metadata::{text_or_na, value_or_na, VulnerabilityMetadata};
pub use pattern::PatternType;
pub use result::{
    best_result, best_score, RetrievalMetadata, RetrievalResult, RetrievalResultSet,
};
