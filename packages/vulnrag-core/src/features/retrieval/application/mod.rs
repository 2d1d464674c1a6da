pub mod hybrid_retriever;

pub use hybrid_retriever::HybridRetriever;
