//! Timing and debug logging helpers

use reqwest::Url;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Runs `f` and returns its result with the time it took.
pub fn measure<T>(name: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();

    debug!(
        label = name,
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Performance measurement"
    );
    (result, duration)
}

/// Verbose logging is on for local development or with `?debug=true`
pub fn debug_enabled(url: &Url) -> bool {
    url.host_str() == Some("localhost") || url.query().is_some_and(|q| q.contains("debug=true"))
}

/// Severity used by app-level debug messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugLevel {
    Error,
    Warn,
    Info,
    Success,
    Debug,
}

impl DebugLevel {
    /// Unknown names map to [`DebugLevel::Info`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "error" => DebugLevel::Error,
            "warn" => DebugLevel::Warn,
            "success" => DebugLevel::Success,
            "debug" => DebugLevel::Debug,
            _ => DebugLevel::Info,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            DebugLevel::Error => "❌",
            DebugLevel::Warn => "⚠️",
            DebugLevel::Info => "ℹ️",
            DebugLevel::Success => "✅",
            DebugLevel::Debug => "🔧",
        }
    }
}

/// Logs `message` at `level` when debugging is enabled for `page_url`.
///
/// Returns whether anything was logged.
pub fn debug_log(page_url: &Url, level: DebugLevel, message: &str) -> bool {
    if !debug_enabled(page_url) {
        return false;
    }

    let emoji = level.emoji();
    match level {
        DebugLevel::Error => error!(target: "eds", "{} {}", emoji, message),
        DebugLevel::Warn => warn!(target: "eds", "{} {}", emoji, message),
        DebugLevel::Info | DebugLevel::Success => info!(target: "eds", "{} {}", emoji, message),
        DebugLevel::Debug => debug!(target: "eds", "{} {}", emoji, message),
    }
    true
}
