//! Offline cache worker
//!
//! Models the app's service worker: it pre-populates a versioned cache on
//! install, drops stale caches on activation, serves controlled GET requests
//! cache-first with a network fallback, and relays push messages into
//! notifications. Platform facilities (cache store, network, the hosting
//! browser) are injected through [`CacheStorage`], [`Fetcher`] and
//! [`WorkerHost`].

mod cache;
mod fetcher;
mod host;
mod http;
mod offline;
mod service;

pub use cache::{CacheError, CacheStorage, MemoryCacheStorage};
pub use fetcher::{FetchError, Fetcher, NetworkFetcher};
pub use host::{
    NotificationAction, NotificationClick, NotificationData, WorkerHost, WorkerNotification,
};
pub use http::{Request, RequestMode, Response, ResponseType};
pub use offline::offline_page;
pub use service::{FetchOutcome, OfflineWorker, PushPayload, WorkerPhase};

use reqwest::Url;
use thiserror::Error;

/// Name of the cache owned by this worker version
pub const CACHE_NAME: &str = "eds-alert-v2.0.0";

/// Assets stored on install, relative to the app origin or absolute
pub const PRECACHE_URLS: [&str; 9] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/data/eds-locations.geojson",
    "/css/style.css",
    "/js/utils.js",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
];

/// Cross-origin hosts whose responses the worker still intercepts
pub const THIRD_PARTY_HOSTS: [&str; 2] = ["unpkg.com", "cdnjs.cloudflare.com"];

/// Endpoint polled by the periodic data update
pub const UPDATES_PATH: &str = "/api/eds-updates";

/// Sync tag for flushing GPS data collected offline
pub const GPS_SYNC_TAG: &str = "background-gps-sync";

/// Periodic sync tag for refreshing camera data
pub const DATA_UPDATE_TAG: &str = "eds-data-update";

/// Errors raised by worker event handlers
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A precache asset answered with a non-success status
    #[error("Failed to cache {url}: status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid push payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A lifecycle event arrived in the wrong phase
    #[error("Cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: WorkerPhase,
    },

    #[error("Host error: {0}")]
    Host(String),
}

/// Static settings for a worker version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub cache_name: String,
    /// Origin the app is served from
    pub origin: Url,
    pub precache_urls: Vec<String>,
    pub third_party_hosts: Vec<String>,
}

impl WorkerConfig {
    /// The stock asset list and cache name for an app served at `origin`
    pub fn new(origin: Url) -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            origin,
            precache_urls: PRECACHE_URLS.iter().map(|s| s.to_string()).collect(),
            third_party_hosts: THIRD_PARTY_HOSTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = cache_name.into();
        self
    }

    /// Resolves a path or absolute URL against the app origin
    pub fn resolve(&self, url: &str) -> Result<Url, WorkerError> {
        self.origin.join(url).map_err(|e| WorkerError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Whether requests to `url` are intercepted: same-origin URLs and the
    /// allowed third-party hosts (including their subdomains)
    pub fn controls(&self, url: &Url) -> bool {
        if url.origin() == self.origin.origin() {
            return true;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        self.third_party_hosts
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }
}
