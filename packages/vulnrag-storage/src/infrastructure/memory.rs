//! In-memory embedding cache
//!
//! Process-local, lock-free. Used by tests and by short-lived CLI runs.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{CacheStats, EmbeddingCache};
use crate::Result;

/// Process-local cache backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryEmbeddingCache {
    entries: DashMap<String, Vec<f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl InMemoryEmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}

impl EmbeddingCache for InMemoryEmbeddingCache {
    fn get(&self, key: &str) -> Result<Option<Vec<f64>>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.value().clone()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    fn put(&self, key: &str, embedding: Vec<f64>) -> Result<()> {
        self.entries.insert(key.to_string(), embedding);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_key;
    use std::sync::Arc;

    #[test]
    fn test_get_put_roundtrip() {
        let cache = InMemoryEmbeddingCache::new();
        let key = content_key("void f() {}");

        assert_eq!(cache.get(&key).unwrap(), None);
        cache.put(&key, vec![1.0, 2.0]).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(vec![1.0, 2.0]));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = InMemoryEmbeddingCache::new();
        cache.put("k", vec![1.0]).unwrap();
        cache.put("k", vec![2.0]).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(vec![2.0]));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(InMemoryEmbeddingCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        cache.put(&format!("{i}-{j}"), vec![i as f64, j as f64]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len().unwrap(), 400);
    }
}
