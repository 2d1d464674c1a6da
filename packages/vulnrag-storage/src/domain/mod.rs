//! Domain layer: the embedding cache port
//!
//! # Port Trait
//!
//! - `EmbeddingCache`: get/put/flush over content-hash keys
//!
//! Keys are produced by [`content_key`] or [`scoped_key`] so every backend
//! agrees on the identity of a query text.

use serde::{Deserialize, Serialize};

use crate::Result;

// ═══════════════════════════════════════════════════════════════════════════
// Keys
// ═══════════════════════════════════════════════════════════════════════════

/// Content-hash key for a code string (Blake3, hex encoded).
///
/// Identical text always maps to the same key; whitespace is significant.
///
/// ```rust
/// use vulnrag_storage::content_key;
///
/// assert_eq!(content_key("a"), content_key("a"));
/// assert_ne!(content_key("a"), content_key("a "));
/// assert_eq!(content_key("a").len(), 64);
/// ```
pub fn content_key(code: &str) -> String {
    blake3::hash(code.as_bytes()).to_hex().to_string()
}

/// Content-hash key for a code string within `scope` (typically an
/// embedding model id). Equal text under different scopes never collides.
///
/// ```rust
/// use vulnrag_storage::scoped_key;
///
/// assert_ne!(scoped_key("openai:small", "a"), scoped_key("openai:large", "a"));
/// assert_ne!(scoped_key("ab", "c"), scoped_key("a", "bc"));
/// ```
pub fn scoped_key(scope: &str, code: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(scope.len() as u64).to_le_bytes());
    hasher.update(scope.as_bytes());
    hasher.update(code.as_bytes());
    hasher.finalize().to_hex().to_string()
}

// ═══════════════════════════════════════════════════════════════════════════
// Port
// ═══════════════════════════════════════════════════════════════════════════

/// Cache of embedding vectors keyed by [`content_key`].
///
/// Implementations must be safe to share between query workers. `put` may be
/// buffered; `flush` makes buffered writes durable.
pub trait EmbeddingCache: Send + Sync {
    /// Look up a cached vector.
    fn get(&self, key: &str) -> Result<Option<Vec<f64>>>;

    /// Store a vector, replacing any previous value for the key.
    fn put(&self, key: &str, embedding: Vec<f64>) -> Result<()>;

    /// Persist buffered writes. No-op for backends without buffering.
    fn flush(&self) -> Result<()>;

    /// Number of cached vectors.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Hit/miss counters reported by caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
}

impl CacheStats {
    /// Hit ratio in [0,1]; 0 before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_is_stable_hex() {
        let key = content_key("strcpy(dst, src);");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, content_key("strcpy(dst, src);"));
    }

    #[test]
    fn test_scoped_key_separates_models() {
        let code = "strcpy(dst, src);";
        assert_eq!(scoped_key("m1", code), scoped_key("m1", code));
        assert_ne!(scoped_key("m1", code), scoped_key("m2", code));
        assert_ne!(scoped_key("m1", code), content_key(code));
        assert_eq!(scoped_key("m1", code).len(), 64);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            writes: 1,
        };
        assert!((stats.hit_ratio() - 0.75).abs() < 1e-12);
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
