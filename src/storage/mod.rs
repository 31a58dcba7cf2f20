//! Namespaced key-value persistence with lazy expiry
//!
//! Values are stored as JSON records under `eds_`-prefixed keys through a
//! pluggable [`KeyValueBackend`]. Every operation fails soft: errors are
//! logged and the caller gets a default value or `false` back.

mod backend;
mod store;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, StorageError};
pub use store::{Storage, StoredRecord, KEY_PREFIX};
