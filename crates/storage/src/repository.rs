use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::time::epoch;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("value for `{key}` is a {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

//
// ─── VALUES ───────────────────────────────────────────────────────────────────
//

/// A typed settings value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredValue {
    Integer(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
}

impl StoredValue {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Integer(_) => "integer",
            StoredValue::Real(_) => "real",
            StoredValue::Timestamp(_) => "timestamp",
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &StoredValue) -> StorageError {
    StorageError::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: found.kind(),
    }
}

//
// ─── CONTRACT ─────────────────────────────────────────────────────────────────
//

/// Durable key-value settings store.
///
/// Absent keys read as zero (numbers) or the Unix epoch (timestamps).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_value(&self, key: &str) -> Result<Option<StoredValue>, StorageError>;

    /// Write all entries at once; either every entry is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_values(&self, entries: &[(&str, StoredValue)]) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_value(&self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        self.set_values(&[(key, value)]).await
    }

    /// Integer under `key`, `0` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if a non-integer value is stored.
    async fn integer(&self, key: &str) -> Result<i64, StorageError> {
        match self.get_value(key).await? {
            None => Ok(0),
            Some(StoredValue::Integer(v)) => Ok(v),
            Some(other) => Err(mismatch(key, "integer", &other)),
        }
    }

    /// Real number under `key`, `0.0` when absent. Integers are widened.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if a timestamp is stored.
    #[allow(clippy::cast_precision_loss)]
    async fn real(&self, key: &str) -> Result<f64, StorageError> {
        match self.get_value(key).await? {
            None => Ok(0.0),
            Some(StoredValue::Real(v)) => Ok(v),
            Some(StoredValue::Integer(v)) => Ok(v as f64),
            Some(other) => Err(mismatch(key, "real", &other)),
        }
    }

    /// Timestamp under `key`, the Unix epoch when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if a number is stored.
    async fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, StorageError> {
        match self.get_value(key).await? {
            None => Ok(epoch()),
            Some(StoredValue::Timestamp(v)) => Ok(v),
            Some(other) => Err(mismatch(key, "timestamp", &other)),
        }
    }
}

//
// ─── IN-MEMORY ────────────────────────────────────────────────────────────────
//

/// In-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_value(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).copied())
    }

    async fn set_values(&self, entries: &[(&str, StoredValue)]) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in entries {
            guard.insert((*key).to_owned(), *value);
        }
        Ok(())
    }
}

//
// ─── AGGREGATE ────────────────────────────────────────────────────────────────
//

/// Store handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let settings: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { settings }
    }
}
