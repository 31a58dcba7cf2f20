//! Offline event log
//!
//! Usage events are appended to a bounded list in [`Storage`] so they survive
//! restarts while the device is offline.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::storage::Storage;

/// Storage key holding the event list
pub const EVENTS_KEY: &str = "analytics_events";

/// Oldest events are dropped beyond this many
pub const MAX_EVENTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    /// Unix epoch milliseconds
    pub timestamp: i64,
    pub properties: Map<String, Value>,
}

/// Records events together with the client's user agent and page URL
#[derive(Debug, Clone)]
pub struct Analytics {
    storage: Storage,
    user_agent: String,
    url: String,
}

impl Analytics {
    pub fn new(storage: Storage, user_agent: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            storage,
            user_agent: user_agent.into(),
            url: url.into(),
        }
    }

    /// Appends an event and returns it.
    ///
    /// Caller-supplied properties are kept; `userAgent` and `url` are added
    /// on top.
    pub fn track(&self, name: &str, properties: Map<String, Value>) -> AnalyticsEvent {
        let mut properties = properties;
        properties.insert("userAgent".to_string(), Value::from(self.user_agent.as_str()));
        properties.insert("url".to_string(), Value::from(self.url.as_str()));

        let event = AnalyticsEvent {
            name: name.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            properties,
        };
        debug!(?event, "Analytics event");

        let mut events = self.events();
        events.push(event.clone());
        if events.len() > MAX_EVENTS {
            events.drain(..events.len() - MAX_EVENTS);
        }
        self.storage.set(EVENTS_KEY, &events, None);

        event
    }

    /// Events recorded so far, oldest first
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.storage.get(EVENTS_KEY, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics() -> Analytics {
        Analytics::new(Storage::in_memory(), "test-agent/1.0", "https://eds.local/?debug=true")
    }

    #[test]
    fn test_track_adds_context_properties() {
        let analytics = analytics();
        let mut props = Map::new();
        props.insert("camera".to_string(), Value::from("OHITS"));

        let event = analytics.track("alert_shown", props);

        assert_eq!(event.name, "alert_shown");
        assert_eq!(event.properties["camera"], "OHITS");
        assert_eq!(event.properties["userAgent"], "test-agent/1.0");
        assert_eq!(event.properties["url"], "https://eds.local/?debug=true");
    }

    #[test]
    fn test_events_persist_in_order() {
        let analytics = analytics();

        analytics.track("first", Map::new());
        analytics.track("second", Map::new());

        let names: Vec<String> = analytics.events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let analytics = analytics();

        for i in 0..(MAX_EVENTS + 5) {
            analytics.track(&format!("event_{}", i), Map::new());
        }

        let events = analytics.events();
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0].name, "event_5");
        assert_eq!(events[MAX_EVENTS - 1].name, format!("event_{}", MAX_EVENTS + 4));
    }
}
