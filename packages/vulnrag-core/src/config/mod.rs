//! Configuration System
//!
//! Three levels, from simplest to most explicit:
//! - Level 1: Preset - `RetrievalConfig::preset(Preset::Fast)`
//! - Level 2: Field override - mutate the returned struct
//! - Level 3: YAML v1 file - `RetrievalConfig::from_yaml("vulnrag.yaml")`
//!
//! # Examples
//!
//! ```rust,ignore
//! use vulnrag_core::config::{Preset, RetrievalConfig};
//!
//! let mut config = RetrievalConfig::preset(Preset::Balanced);
//! config.top_k = 5;
//! config.validate()?;
//!
//! let config = RetrievalConfig::from_yaml("team.yaml")?;
//! ```
//!
//! ```yaml
//! version: 1
//! preset: thorough
//! overrides:
//!   artifacts_dir: data/index
//!   weights: { structural: 0.4, lexical: 0.3, embedding: 0.3 }
//!   cache: { backend: sqlite, path: .vulnrag/cache.db, flush_every: 1 }
//! ```
//!
//! The embedding API key is read from the environment, never from YAML.

pub mod error;
pub mod io;
pub mod preset;
pub mod retrieval_config;
pub mod sections;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use retrieval_config::RetrievalConfig;
pub use sections::{validate_weights, CacheBackend, CacheConfig, CpgConfig, EmbeddingConfig};
