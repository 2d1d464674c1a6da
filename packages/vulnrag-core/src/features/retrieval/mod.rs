//! Hybrid Retrieval
//!
//! Double indexation of a vulnerability corpus: one index of vulnerable
//! code (VULN) and one of its fixes (PATCH). A query is scored against both
//! through three channels (scaled structural vectors, TF-IDF over the
//! semantic text, dense embeddings), each min-max normalized per index and
//! fused with configurable weights.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (HybridRetriever - entry point)
//!           ↓
//! ports/ (EmbeddingProvider, CpgGenerator)
//!           ↓
//! infrastructure/ (SimilarityIndex, artifacts, IndexBuilder, adapters)
//!           ↓
//! domain/ (IndexEntry, FusionWeights, RetrievalResultSet)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vulnrag_core::features::retrieval::{HybridRetriever, UnavailableEmbedder};
//!
//! let embedder = Box::new(UnavailableEmbedder::new(1536, "offline"));
//! let retriever = HybridRetriever::load(Path::new("data/index"), embedder)?;
//! let set = retriever.hybrid_retrieval(code, 10)?;
//! println!("{}", set.best_vuln_score);
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

// Re-export application layer (primary interface)
pub use application::HybridRetriever;

// Re-export domain types
pub use domain::{
    best_result, best_score, text_or_na, value_or_na, ChannelScores, FusionWeights, IndexEntry,
    PatternType, QueryFeatures, RankedHit, RetrievalMetadata, RetrievalResult, RetrievalResultSet,
    VulnerabilityMetadata,
};

pub use error::{EmbeddingError, RetrievalError};

pub use infrastructure::{
    artifact_path, base_provider, cached_provider, load_corpus, load_index, open_cache,
    save_index, ArtifactKind, BuildReport, CachedEmbedder, CorpusRecord, IndexBuildStats,
    IndexBuilder, JoernCpgGenerator, SimilarityIndex, StandardScaler, UnavailableEmbedder,
    MANIFEST_FILE,
};
#[cfg(feature = "openai")]
pub use infrastructure::{OpenAiEmbedder, OPENAI_API_KEY_ENV};

pub use ports::{CpgGenerationError, CpgGenerator, EmbeddingProvider};
