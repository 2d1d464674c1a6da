//! Retrieval infrastructure: index storage, similarity search and adapters
//! for the external embedding and CPG services

pub mod artifacts;
pub mod cached_embedder;
pub mod factory;
pub mod index_builder;
pub mod joern;
#[cfg(feature = "openai")]
pub mod openai;
pub mod scaler;
pub mod similarity_index;
pub mod unavailable_embedder;

pub use artifacts::{artifact_path, load_index, save_index, ArtifactKind};
pub use cached_embedder::CachedEmbedder;
pub use factory::{base_provider, cached_provider, open_cache};
pub use index_builder::{
    load_corpus, BuildReport, CorpusRecord, IndexBuildStats, IndexBuilder, MANIFEST_FILE,
};
pub use joern::JoernCpgGenerator;
#[cfg(feature = "openai")]
pub use openai::{OpenAiEmbedder, OPENAI_API_KEY_ENV};
pub use scaler::StandardScaler;
pub use similarity_index::SimilarityIndex;
pub use unavailable_embedder::UnavailableEmbedder;
