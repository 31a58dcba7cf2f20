//! The worker's view of its hosting environment

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::WorkerError;

/// A button shown on a pushed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// Data attached to a pushed notification, returned on click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

/// A notification the worker asks the host to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

/// A click on a notification previously shown by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    /// Identifier the host returned from `show_notification`
    pub notification_id: String,
    /// The action button pressed, `None` for a click on the body
    pub action: Option<String>,
    pub data: NotificationData,
}

/// Operations the worker performs on the browser around it
#[async_trait]
pub trait WorkerHost: Send + Sync {
    /// Activates this worker without waiting for old pages to close
    async fn skip_waiting(&self);

    /// Takes control of all open pages
    async fn claim_clients(&self);

    /// Displays a notification and returns its identifier
    async fn show_notification(&self, notification: &WorkerNotification) -> Result<String, WorkerError>;

    async fn close_notification(&self, notification_id: &str);

    async fn open_window(&self, url: &str) -> Result<(), WorkerError>;
}
