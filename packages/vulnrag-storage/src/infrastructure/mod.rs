//! Infrastructure layer - cache adapters

mod json_file;
mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use json_file::JsonFileEmbeddingCache;
pub use memory::InMemoryEmbeddingCache;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEmbeddingCache;
