//! JSON-file embedding cache with periodic flush
//!
//! Reads and writes go to an in-memory map; the whole map is written back to
//! disk every `flush_every` puts, on explicit `flush`, and on drop. The file
//! write is atomic (tmp file + rename), so concurrent readers never observe a
//! half-written cache.

use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::EmbeddingCache;
use crate::{Result, StorageError};

/// Embedding cache persisted as a single JSON object `{key: [f64, ...]}`.
#[derive(Debug)]
pub struct JsonFileEmbeddingCache {
    path: PathBuf,
    entries: DashMap<String, Vec<f64>>,
    pending: AtomicUsize,
    flush_every: usize,
    write_lock: Mutex<()>,
}

impl JsonFileEmbeddingCache {
    /// Open (or create on first flush) the cache file at `path`.
    ///
    /// `flush_every` is clamped to at least 1.
    pub fn open(path: impl AsRef<Path>, flush_every: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let loaded: HashMap<String, Vec<f64>> = serde_json::from_str(&content)?;
                for (key, value) in loaded {
                    entries.insert(key, value);
                }
            }
            debug!(path = %path.display(), entries = entries.len(), "loaded embedding cache");
        }

        Ok(Self {
            path,
            entries,
            pending: AtomicUsize::new(0),
            flush_every: flush_every.max(1),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::config("cache write lock poisoned"))?;

        let snapshot: BTreeMap<String, Vec<f64>> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let bytes = serde_json::to_vec(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Atomic write: tmp file + rename
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        self.pending.store(0, Ordering::Release);
        debug!(path = %self.path.display(), entries = snapshot.len(), "flushed embedding cache");
        Ok(())
    }
}

impl EmbeddingCache for JsonFileEmbeddingCache {
    fn get(&self, key: &str) -> Result<Option<Vec<f64>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: &str, embedding: Vec<f64>) -> Result<()> {
        self.entries.insert(key.to_string(), embedding);
        let pending = self.pending.fetch_add(1, Ordering::AcqRel) + 1;
        if pending >= self.flush_every {
            self.write_snapshot()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if self.pending.load(Ordering::Acquire) == 0 && self.path.exists() {
            return Ok(());
        }
        self.write_snapshot()
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}

impl Drop for JsonFileEmbeddingCache {
    fn drop(&mut self) {
        if self.pending.load(Ordering::Acquire) > 0 {
            if let Err(err) = self.write_snapshot() {
                warn!(path = %self.path.display(), error = %err, "failed to flush embedding cache on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flush_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        {
            let cache = JsonFileEmbeddingCache::open(&path, 100).unwrap();
            cache.put("a", vec![0.5, 0.25]).unwrap();
            assert!(!path.exists(), "below flush threshold");
            cache.flush().unwrap();
            assert!(path.exists());
        }

        let reopened = JsonFileEmbeddingCache::open(&path, 100).unwrap();
        assert_eq!(reopened.get("a").unwrap(), Some(vec![0.5, 0.25]));
    }

    #[test]
    fn test_periodic_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let cache = JsonFileEmbeddingCache::open(&path, 2).unwrap();
        cache.put("a", vec![1.0]).unwrap();
        assert!(!path.exists());
        cache.put("b", vec![2.0]).unwrap();
        assert!(path.exists());

        let on_disk: HashMap<String, Vec<f64>> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        {
            let cache = JsonFileEmbeddingCache::open(&path, 1000).unwrap();
            cache.put("k", vec![3.0]).unwrap();
        }

        let reopened = JsonFileEmbeddingCache::open(&path, 1000).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(vec![3.0]));
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let cache = JsonFileEmbeddingCache::open(&path, 1).unwrap();
        cache.put("k", vec![1.0]).unwrap();

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension() == Some(std::ffi::OsStr::new("tmp")))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileEmbeddingCache::open(&path, 1).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Serialization);
    }
}
