//! Embedding cache storage for vulnrag
//!
//! Query embeddings are expensive (one network round-trip each) and fully
//! determined by the query text, so they are cached by a content hash of the
//! code string. The retriever only sees the [`EmbeddingCache`] port; the
//! backend is chosen by configuration.
//!
//! ## Backends
//!
//! | Backend                   | Persistence               | Concurrency                 |
//! |---------------------------|---------------------------|-----------------------------|
//! | `InMemoryEmbeddingCache`  | none                      | lock-free map               |
//! | `JsonFileEmbeddingCache`  | JSON file, periodic flush | lock-free map, atomic flush |
//! | `SqliteEmbeddingCache`    | SQLite (per put)          | mutex around the connection |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vulnrag_storage::{content_key, EmbeddingCache, InMemoryEmbeddingCache};
//!
//! let cache = InMemoryEmbeddingCache::new();
//! let key = content_key("int main() { return 0; }");
//! cache.put(&key, vec![0.1, 0.2])?;
//! assert_eq!(cache.get(&key)?, Some(vec![0.1, 0.2]));
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::{content_key, scoped_key, CacheStats, EmbeddingCache};
pub use error::{ErrorKind, Result, StorageError};
pub use infrastructure::{InMemoryEmbeddingCache, JsonFileEmbeddingCache};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteEmbeddingCache;
