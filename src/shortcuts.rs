//! Launch shortcuts passed in the page URL
//!
//! Home-screen shortcuts open the app with `?action=<name>`; the matching UI
//! hook fires after a short delay so the page has time to finish loading.

use reqwest::Url;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Query parameters of `url`; a repeated name keeps its last value
pub fn url_params(url: &Url) -> BTreeMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Actions a launch URL can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    StartTracking,
    TestAlert,
    OpenSettings,
}

impl ShortcutAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start-tracking" => Some(ShortcutAction::StartTracking),
            "test-alert" => Some(ShortcutAction::TestAlert),
            "open-settings" => Some(ShortcutAction::OpenSettings),
            _ => None,
        }
    }

    /// Reads the `action` query parameter
    pub fn from_url(url: &Url) -> Option<Self> {
        url_params(url)
            .get("action")
            .and_then(|name| Self::from_name(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::StartTracking => "start-tracking",
            ShortcutAction::TestAlert => "test-alert",
            ShortcutAction::OpenSettings => "open-settings",
        }
    }

    /// How long to wait after page load before firing
    pub fn delay(&self) -> Duration {
        match self {
            ShortcutAction::StartTracking => Duration::from_millis(2000),
            ShortcutAction::TestAlert | ShortcutAction::OpenSettings => Duration::from_millis(1000),
        }
    }
}

/// UI entry points the shortcuts drive
pub trait ShortcutHooks: Send + Sync {
    fn is_tracking(&self) -> bool;
    /// Presses the start/stop tracking toggle
    fn toggle_tracking(&self);
    fn test_alert(&self);
    fn open_settings(&self);
}

/// Waits the action's delay, then invokes its hook.
///
/// Start-tracking leaves an already running tracker alone.
pub async fn dispatch(action: ShortcutAction, hooks: &dyn ShortcutHooks) {
    tokio::time::sleep(action.delay()).await;
    debug!(action = action.name(), "Running launch shortcut");

    match action {
        ShortcutAction::StartTracking => {
            if !hooks.is_tracking() {
                hooks.toggle_tracking();
            }
        }
        ShortcutAction::TestAlert => hooks.test_alert(),
        ShortcutAction::OpenSettings => hooks.open_settings(),
    }
}

/// Runs the shortcut requested by `url`, if any, and returns it
pub async fn handle_shortcuts(url: &Url, hooks: &dyn ShortcutHooks) -> Option<ShortcutAction> {
    let action = ShortcutAction::from_url(url)?;
    dispatch(action, hooks).await;
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingHooks {
        tracking: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ShortcutHooks for RecordingHooks {
        fn is_tracking(&self) -> bool {
            self.tracking
        }

        fn toggle_tracking(&self) {
            self.calls.lock().unwrap().push("toggle");
        }

        fn test_alert(&self) {
            self.calls.lock().unwrap().push("test_alert");
        }

        fn open_settings(&self) {
            self.calls.lock().unwrap().push("settings");
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_url_params() {
        let params = url_params(&url("https://eds.local/?action=test-alert&debug=true&debug=false"));
        assert_eq!(params.get("action").map(String::as_str), Some("test-alert"));
        assert_eq!(params.get("debug").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_action_from_url() {
        assert_eq!(
            ShortcutAction::from_url(&url("https://eds.local/?action=start-tracking")),
            Some(ShortcutAction::StartTracking)
        );
        assert_eq!(ShortcutAction::from_url(&url("https://eds.local/?action=dance")), None);
        assert_eq!(ShortcutAction::from_url(&url("https://eds.local/")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_tracking_waits_two_seconds() {
        let hooks = RecordingHooks::default();
        let started = Instant::now();

        let action = handle_shortcuts(&url("https://eds.local/?action=start-tracking"), &hooks).await;

        assert_eq!(action, Some(ShortcutAction::StartTracking));
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(*hooks.calls.lock().unwrap(), vec!["toggle"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_tracking_skips_when_already_tracking() {
        let hooks = RecordingHooks {
            tracking: true,
            ..RecordingHooks::default()
        };

        dispatch(ShortcutAction::StartTracking, &hooks).await;

        assert!(hooks.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_actions_fire_after_one_second() {
        let hooks = RecordingHooks::default();
        let started = Instant::now();

        dispatch(ShortcutAction::TestAlert, &hooks).await;
        dispatch(ShortcutAction::OpenSettings, &hooks).await;

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(*hooks.calls.lock().unwrap(), vec!["test_alert", "settings"]);
    }

    #[tokio::test]
    async fn test_no_action_does_nothing() {
        let hooks = RecordingHooks::default();
        assert!(handle_shortcuts(&url("https://eds.local/"), &hooks).await.is_none());
        assert!(hooks.calls.lock().unwrap().is_empty());
    }
}
