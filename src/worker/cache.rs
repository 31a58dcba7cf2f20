//! Named response caches

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use super::http::{Request, Response};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache not found: {0}")]
    NotFound(String),

    #[error("Cache storage lock poisoned")]
    Poisoned,
}

/// A set of named request/response caches
///
/// Each write of a single entry is atomic; [`put_all`](CacheStorage::put_all)
/// stores either every entry or none.
pub trait CacheStorage: Send + Sync {
    /// Creates the named cache if it does not exist yet
    fn open(&self, name: &str) -> Result<(), CacheError>;

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<(), CacheError>;

    fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), CacheError>;

    /// Looks the request up in one cache
    fn match_in(&self, name: &str, request: &Request) -> Option<Response>;

    /// Looks the request up in every cache, oldest cache first
    fn match_any(&self, request: &Request) -> Option<Response>;

    /// Cache names in creation order
    fn keys(&self) -> Vec<String>;

    /// Drops a whole cache; returns whether it existed
    fn delete(&self, name: &str) -> bool;
}

#[derive(Debug, Default)]
struct NamedCache {
    name: String,
    entries: HashMap<String, Response>,
}

/// In-process [`CacheStorage`]
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<Vec<NamedCache>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the named cache, if it exists
    pub fn len_of(&self, name: &str) -> Option<usize> {
        let caches = self.caches.lock().ok()?;
        caches
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entries.len())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut caches = self.caches.lock().map_err(|_| CacheError::Poisoned)?;
        if !caches.iter().any(|c| c.name == name) {
            caches.push(NamedCache {
                name: name.to_string(),
                entries: HashMap::new(),
            });
        }
        Ok(())
    }

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<(), CacheError> {
        self.put_all(name, vec![(request.clone(), response.clone())])
    }

    fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), CacheError> {
        let mut caches = self.caches.lock().map_err(|_| CacheError::Poisoned)?;
        let cache = caches
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CacheError::NotFound(name.to_string()))?;

        for (request, response) in entries {
            cache.entries.insert(request.cache_key().to_string(), response);
        }
        Ok(())
    }

    fn match_in(&self, name: &str, request: &Request) -> Option<Response> {
        let caches = self.caches.lock().ok()?;
        caches
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.entries.get(request.cache_key()).cloned())
    }

    fn match_any(&self, request: &Request) -> Option<Response> {
        let caches = self.caches.lock().ok()?;
        caches
            .iter()
            .find_map(|c| c.entries.get(request.cache_key()).cloned())
    }

    fn keys(&self) -> Vec<String> {
        match self.caches.lock() {
            Ok(caches) => caches.iter().map(|c| c.name.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn delete(&self, name: &str) -> bool {
        let Ok(mut caches) = self.caches.lock() else {
            return false;
        };
        let before = caches.len();
        caches.retain(|c| c.name != name);
        caches.len() != before
    }
}
