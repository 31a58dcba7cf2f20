//! Lifecycle and event handling for the offline worker

use futures::future::join_all;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use super::cache::CacheStorage;
use super::fetcher::Fetcher;
use super::host::{
    NotificationAction, NotificationClick, NotificationData, WorkerHost, WorkerNotification,
};
use super::http::{Request, RequestMode, Response, ResponseType};
use super::offline::offline_page;
use super::{WorkerConfig, WorkerError, DATA_UPDATE_TAG, GPS_SYNC_TAG, UPDATES_PATH};

const DEFAULT_PUSH_TITLE: &str = "EDS Uyarı";
const DEFAULT_PUSH_BODY: &str = "Yeni EDS kamerası tespit edildi";

/// Where the worker is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Loaded, install not started
    Parsed,
    Installing,
    /// Installed and waiting to activate
    Installed,
    Activating,
    /// Controlling pages and intercepting fetches
    Activated,
    /// Install failed; this worker will never activate
    Redundant,
}

/// What the worker did with an intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not handled; the page performs the request itself
    Passthrough,
    Respond(Response),
}

/// Body of a push message; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

impl PushPayload {
    fn into_notification(self) -> WorkerNotification {
        WorkerNotification {
            title: self.title.unwrap_or_else(|| DEFAULT_PUSH_TITLE.to_string()),
            body: self.body.unwrap_or_else(|| DEFAULT_PUSH_BODY.to_string()),
            icon: "/assets/icons/icon-192x192.png".to_string(),
            badge: "/assets/icons/icon-72x72.png".to_string(),
            vibrate: vec![200, 100, 200],
            data: NotificationData {
                url: self.url.unwrap_or_else(|| "/".to_string()),
            },
            actions: vec![
                NotificationAction {
                    action: "open".to_string(),
                    title: "Aç".to_string(),
                    icon: "/assets/icons/open-icon.png".to_string(),
                },
                NotificationAction {
                    action: "dismiss".to_string(),
                    title: "Kapat".to_string(),
                    icon: "/assets/icons/close-icon.png".to_string(),
                },
            ],
        }
    }
}

/// Messages pages can post to the worker
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ControlMessage {
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

/// The offline cache worker
///
/// Each `handle_*` method corresponds to one worker event and runs it to
/// completion.
pub struct OfflineWorker {
    config: WorkerConfig,
    caches: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    host: Arc<dyn WorkerHost>,
    phase: Mutex<WorkerPhase>,
}

impl std::fmt::Debug for OfflineWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl OfflineWorker {
    pub fn new(
        config: WorkerConfig,
        caches: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        host: Arc<dyn WorkerHost>,
    ) -> Self {
        Self {
            config,
            caches,
            fetcher,
            host,
            phase: Mutex::new(WorkerPhase::Parsed),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn phase(&self) -> WorkerPhase {
        match self.phase.lock() {
            Ok(phase) => *phase,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_phase(&self, next: WorkerPhase) {
        match self.phase.lock() {
            Ok(mut phase) => *phase = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    fn expect_phase(&self, action: &'static str, expected: WorkerPhase) -> Result<(), WorkerError> {
        let phase = self.phase();
        if phase != expected {
            return Err(WorkerError::InvalidPhase { action, phase });
        }
        Ok(())
    }

    /// Install: pre-populates the versioned cache, then skips waiting.
    ///
    /// The whole asset list is first stored as one all-or-nothing batch. If
    /// any asset fails, each one is retried on its own and individual
    /// failures are only logged, so one bad asset cannot block the install.
    ///
    /// # Returns
    /// An error if the worker is not freshly parsed, or if the cache cannot
    /// be opened; the worker is then [`WorkerPhase::Redundant`].
    pub async fn handle_install(&self) -> Result<(), WorkerError> {
        self.expect_phase("install", WorkerPhase::Parsed)?;
        self.set_phase(WorkerPhase::Installing);
        info!(cache = %self.config.cache_name, "Service worker installing");

        if let Err(e) = self.caches.open(&self.config.cache_name) {
            self.set_phase(WorkerPhase::Redundant);
            return Err(e.into());
        }

        let urls = match self.precache_urls() {
            Ok(urls) => urls,
            Err(e) => {
                self.set_phase(WorkerPhase::Redundant);
                return Err(e);
            }
        };

        let batch: Vec<Request> = urls
            .iter()
            .map(|url| Request::get(url.clone()).with_mode(RequestMode::NoCors))
            .collect();

        if let Err(e) = self.add_all(batch).await {
            warn!(error = %e, "Some resources failed to cache");

            let attempts = urls.iter().map(|url| async move {
                let result = self.add(Request::get(url.clone())).await;
                (url, result)
            });
            for (url, result) in join_all(attempts).await {
                if let Err(e) = result {
                    warn!(url = %url, error = %e, "Failed to cache");
                }
            }
        }

        self.set_phase(WorkerPhase::Installed);
        info!("Service worker installation complete");
        self.host.skip_waiting().await;
        Ok(())
    }

    fn precache_urls(&self) -> Result<Vec<reqwest::Url>, WorkerError> {
        self.config
            .precache_urls
            .iter()
            .map(|url| self.config.resolve(url))
            .collect()
    }

    /// Fetches every request and stores them all, or stores nothing
    async fn add_all(&self, requests: Vec<Request>) -> Result<(), WorkerError> {
        let responses = join_all(requests.iter().map(|r| self.fetcher.fetch(r))).await;

        let mut entries = Vec::with_capacity(requests.len());
        for (request, response) in requests.into_iter().zip(responses) {
            let response = response?;
            if !response.ok() {
                return Err(WorkerError::BadStatus {
                    url: request.url.to_string(),
                    status: response.status,
                });
            }
            entries.push((request, response));
        }

        self.caches.put_all(&self.config.cache_name, entries)?;
        Ok(())
    }

    async fn add(&self, request: Request) -> Result<(), WorkerError> {
        let response = self.fetcher.fetch(&request).await?;
        if !response.ok() {
            return Err(WorkerError::BadStatus {
                url: request.url.to_string(),
                status: response.status,
            });
        }
        self.caches.put(&self.config.cache_name, &request, &response)?;
        Ok(())
    }

    /// Activate: deletes every cache but the current version's, then takes
    /// control of open pages.
    pub async fn handle_activate(&self) -> Result<(), WorkerError> {
        self.expect_phase("activate", WorkerPhase::Installed)?;
        self.set_phase(WorkerPhase::Activating);
        info!("Service worker activating");

        for name in self.caches.keys() {
            if name != self.config.cache_name {
                info!(cache = %name, "Deleting old cache");
                self.caches.delete(&name);
            }
        }

        self.set_phase(WorkerPhase::Activated);
        info!("Service worker activated");
        self.host.claim_clients().await;
        Ok(())
    }

    /// Fetch: serves controlled GET requests cache-first.
    ///
    /// On a cache miss the network response is returned, and stored first
    /// when it is a same-origin 200. If the network fails, navigations get
    /// the offline page and other requests get the error.
    ///
    /// # Arguments
    /// * `request` - The intercepted page request
    ///
    /// # Returns
    /// [`FetchOutcome::Passthrough`] for requests the worker does not handle:
    /// before activation, non-GET methods and uncontrolled hosts.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, WorkerError> {
        if self.phase() != WorkerPhase::Activated
            || !request.is_get()
            || !self.config.controls(&request.url)
        {
            return Ok(FetchOutcome::Passthrough);
        }

        if let Some(cached) = self.caches.match_any(request) {
            debug!(url = %request.url, "Serving from cache");
            return Ok(FetchOutcome::Respond(cached));
        }

        debug!(url = %request.url, "Fetching from network");
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == 200 && response.response_type == ResponseType::Basic {
                    if let Err(e) = self.caches.put(&self.config.cache_name, request, &response) {
                        warn!(url = %request.url, error = %e, "Failed to cache response");
                    }
                }
                Ok(FetchOutcome::Respond(response))
            }
            Err(e) => {
                error!(url = %request.url, error = %e, "Network fetch failed");
                if request.mode == RequestMode::Navigate {
                    Ok(FetchOutcome::Respond(offline_page()))
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Push: shows the pushed message as a notification.
    ///
    /// Pushes without a payload are ignored.
    ///
    /// # Arguments
    /// * `payload` - Raw push data, expected to be a JSON [`PushPayload`]
    pub async fn handle_push(&self, payload: Option<&[u8]>) -> Result<(), WorkerError> {
        let Some(payload) = payload else {
            return Ok(());
        };

        let payload: PushPayload = serde_json::from_slice(payload)?;
        let notification = payload.into_notification();
        self.host.show_notification(&notification).await?;
        Ok(())
    }

    /// Notification click: closes the notification and, for the "open"
    /// action, opens its URL.
    pub async fn handle_notification_click(
        &self,
        click: &NotificationClick,
    ) -> Result<(), WorkerError> {
        self.host.close_notification(&click.notification_id).await;

        if click.action.as_deref() == Some("open") {
            self.host.open_window(&click.data.url).await?;
        }
        Ok(())
    }

    /// Message: handles control messages posted by pages.
    ///
    /// # Arguments
    /// * `message` - The posted JSON value, e.g. `{"type": "SKIP_WAITING"}`
    ///
    /// # Returns
    /// Whether the message was recognized.
    pub async fn handle_message(&self, message: &serde_json::Value) -> bool {
        match ControlMessage::deserialize(message) {
            Ok(ControlMessage::SkipWaiting) => {
                self.host.skip_waiting().await;
                true
            }
            Err(_) => false,
        }
    }

    /// Background sync. Returns whether the tag was recognized.
    pub async fn handle_sync(&self, tag: &str) -> bool {
        if tag != GPS_SYNC_TAG {
            return false;
        }
        info!("Background GPS sync triggered");
        // Nothing is queued for upload yet, so a sync only records that it ran.
        info!("Background sync completed");
        true
    }

    /// Periodic sync: refreshes camera data from the update endpoint.
    ///
    /// A valid JSON answer is stored in the current cache so pages can read
    /// it offline. Failures are logged, not raised. Returns whether the tag
    /// was recognized.
    pub async fn handle_periodic_sync(&self, tag: &str) -> bool {
        if tag != DATA_UPDATE_TAG {
            return false;
        }
        info!("Periodic sync: updating EDS data");

        if let Err(e) = self.update_eds_data().await {
            error!(error = %e, "EDS data update failed");
        }
        true
    }

    async fn update_eds_data(&self) -> Result<(), WorkerError> {
        let request = Request::get(self.config.resolve(UPDATES_PATH)?);
        let response = self.fetcher.fetch(&request).await?;
        if !response.ok() {
            warn!(status = response.status, "EDS update endpoint returned an error");
            return Ok(());
        }

        serde_json::from_slice::<serde_json::Value>(&response.body)?;
        self.caches.put(&self.config.cache_name, &request, &response)?;
        info!("EDS data updated");
        Ok(())
    }
}
