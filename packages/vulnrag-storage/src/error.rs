//! Embedding cache errors

use std::fmt;
use thiserror::Error;

/// What went wrong in a cache backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// SQLite backend
    Database,
    /// Vector or cache file (de)serialization
    Serialization,
    /// A stored vector is unusable (non-finite values, bad blob length)
    Corrupt,
    /// Backend misconfigured (missing path, disabled feature)
    Config,
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Corrupt => "corrupt",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache backend failure, displayed as `[kind] message`
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Entry `key` holds an unusable vector
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Corrupt,
            format!("cache entry {}: {}", key.into(), reason.into()),
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        let message = format!("sqlite: {err}");
        StorageError::database(message).with_source(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("cache json: {err}");
        StorageError::serialization(message).with_source(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("cache file: {err}");
        StorageError::new(ErrorKind::IO, message).with_source(err)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_prefixes_kind() {
        let err = StorageError::config("cache.path is required");
        assert_eq!(err.to_string(), "[config] cache.path is required");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_corrupt_names_entry() {
        let err = StorageError::corrupt("9f2c", "blob of 7 bytes");
        assert_eq!(err.kind, ErrorKind::Corrupt);
        assert_eq!(err.to_string(), "[corrupt] cache entry 9f2c: blob of 7 bytes");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: StorageError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert_eq!(err.kind, ErrorKind::IO);
        assert!(err.source().unwrap().to_string().contains("read-only"));
    }

    #[test]
    fn test_truncated_cache_file_is_serialization() {
        let json_err = serde_json::from_str::<Vec<f64>>("[0.1, 0.2").unwrap_err();
        let err: StorageError = json_err.into();
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(err.message.starts_with("cache json:"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_error_is_database() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.source.is_some());
    }
}
