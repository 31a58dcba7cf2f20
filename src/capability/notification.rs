//! System notifications with a permission prompt

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{Capabilities, Capability};

/// Notifications that do not require interaction close after this long
pub const AUTO_CLOSE_AFTER: Duration = Duration::from_secs(6);

/// The user's answer to the notification permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not asked yet
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub require_interaction: bool,
    pub tag: Option<String>,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            body: None,
            icon: "/assets/icons/camera-icon.png".to_string(),
            badge: "/assets/icons/badge-icon.png".to_string(),
            vibrate: vec![200, 100, 200],
            require_interaction: true,
            tag: None,
        }
    }
}

/// A notification currently on screen
pub trait NotificationHandle: Send + Sync {
    fn close(&self);
}

/// Platform notification center
#[async_trait]
pub trait Notifier: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Prompts the user and returns their answer
    async fn request_permission(&self) -> NotificationPermission;

    fn show(&self, title: &str, options: &NotificationOptions) -> Arc<dyn NotificationHandle>;
}

impl Capabilities {
    /// Shows a notification, prompting for permission if it was never asked.
    ///
    /// Returns `None` when notifications are unavailable or the permission
    /// is denied. Notifications that do not require interaction are closed
    /// after [`AUTO_CLOSE_AFTER`]; that timer needs a running tokio runtime.
    pub async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Option<Arc<dyn NotificationHandle>> {
        let Capability::Available(notifier) = &self.notifications else {
            return None;
        };

        let mut permission = notifier.permission();
        if permission == NotificationPermission::Default {
            permission = notifier.request_permission().await;
            debug!(?permission, "Notification permission prompt answered");
        }
        if permission != NotificationPermission::Granted {
            return None;
        }

        let handle = notifier.show(title, options);

        if !options.require_interaction {
            let to_close = handle.clone();
            tokio::spawn(async move {
                tokio::time::sleep(AUTO_CLOSE_AFTER).await;
                to_close.close();
            });
        }

        Some(handle)
    }
}
