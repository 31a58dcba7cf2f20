//! The namespaced storage service

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::backend::{KeyValueBackend, StorageError};

/// Prefix applied to every key this app writes
pub const KEY_PREFIX: &str = "eds_";

/// On-disk shape of a stored value
///
/// Timestamps are Unix epoch milliseconds. A record whose `expiry` has
/// passed is treated as absent and removed on the next read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    pub value: T,
    pub timestamp: i64,
    pub expiry: Option<i64>,
}

impl<T> StoredRecord<T> {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        matches!(self.expiry, Some(expiry) if now_ms > expiry)
    }
}

/// Fail-soft key-value store over a [`KeyValueBackend`]
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// A storage service over a fresh [`MemoryBackend`](super::MemoryBackend)
    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::MemoryBackend::new()))
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }

    /// Stores `value` under `key`, optionally expiring at `expiry`.
    ///
    /// # Arguments
    /// * `key` - Key without the app prefix
    /// * `value` - Any serializable value
    /// * `expiry` - When the value stops being returned; `None` keeps it
    ///
    /// # Returns
    /// `false` (after logging a warning) if the value cannot be serialized
    /// or the backend rejects the write.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, expiry: Option<DateTime<Utc>>) -> bool {
        match self.try_set(key, value, expiry) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Storage error");
                false
            }
        }
    }

    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A `ttl` that pushes the expiry past the representable date range is
    /// rejected with a warning and nothing is written.
    pub fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        match Utc::now().checked_add_signed(ttl) {
            Some(expiry) => self.set(key, value, Some(expiry)),
            None => {
                warn!(key, ttl_secs = ttl.num_seconds(), "Storage expiry out of range");
                false
            }
        }
    }

    fn try_set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        let record = StoredRecord {
            value,
            timestamp: Utc::now().timestamp_millis(),
            expiry: expiry.map(|e| e.timestamp_millis()),
        };
        let json = serde_json::to_string(&record)?;
        self.backend.set_item(&Self::namespaced(key), &json)
    }

    /// Reads the value under `key`, or `None` if it is missing, expired or
    /// unreadable.
    ///
    /// Expired records are removed as a side effect.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Storage error");
                None
            }
        }
    }

    /// Reads the value under `key`, falling back to `default`.
    ///
    /// # Arguments
    /// * `key` - Key without the app prefix
    /// * `default` - Returned when the value is missing, expired, unreadable
    ///   or of a different type
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let full_key = Self::namespaced(key);
        let Some(raw) = self.backend.get_item(&full_key)? else {
            return Ok(None);
        };

        let record: StoredRecord<T> = serde_json::from_str(&raw)?;
        if record.is_expired_at(Utc::now().timestamp_millis()) {
            self.backend.remove_item(&full_key)?;
            return Ok(None);
        }

        Ok(Some(record.value))
    }

    /// Deletes `key`; returns `false` if the backend failed
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_item(&Self::namespaced(key)) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Storage error");
                false
            }
        }
    }

    /// Deletes every key in this app's namespace, leaving foreign keys alone
    pub fn clear(&self) -> bool {
        match self.try_clear() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Storage error");
                false
            }
        }
    }

    fn try_clear(&self) -> Result<(), StorageError> {
        for key in self.backend.keys()? {
            if key.starts_with(KEY_PREFIX) {
                self.backend.remove_item(&key)?;
            }
        }
        Ok(())
    }
}
