//! SQLite embedding cache
//!
//! Every `put` is its own statement, so the cache file is consistent after
//! each write and can be shared by several worker processes.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::EmbeddingCache;
use crate::{Result, StorageError};

/// SQLite-backed embedding cache
#[derive(Clone)]
pub struct SqliteEmbeddingCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEmbeddingCache {
    /// Open (or create) a cache database at the given path
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::database("connection mutex poisoned"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS embeddings (
                content_key TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL,
                vector BLOB NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

fn encode(embedding: &[f64]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode(key: &str, dimension: i64, bytes: &[u8]) -> Result<Vec<f64>> {
    if dimension < 0 || bytes.len() != dimension as usize * 8 {
        return Err(StorageError::corrupt(
            key,
            format!("{} bytes for dimension {}", bytes.len(), dimension),
        ));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect())
}

impl EmbeddingCache for SqliteEmbeddingCache {
    fn get(&self, key: &str) -> Result<Option<Vec<f64>>> {
        let conn = self.lock()?;
        let row: Option<(i64, Vec<u8>)> = conn
            .query_row(
                "SELECT dimension, vector FROM embeddings WHERE content_key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((dimension, bytes)) => decode(key, dimension, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, embedding: Vec<f64>) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO embeddings (content_key, dimension, vector, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                key,
                embedding.len() as i64,
                encode(&embedding),
                Utc::now().timestamp_millis()
            ],
        )?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
