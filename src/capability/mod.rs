//! Platform capability wrappers
//!
//! Each optional platform feature (speech, vibration, notifications, battery
//! and connection introspection) is injected as a trait object wrapped in
//! [`Capability`]. Operations on an unavailable capability degrade to a
//! no-op, `None`, or [`CapabilityError::NotSupported`].

mod device;
mod notification;
mod speech;
mod vibration;

pub use device::{
    BatteryInfo, BatteryProvider, BatteryStatus, DeviceInfo, HostEnvironment, NetworkInfo,
    NetworkInfoProvider, ScreenInfo,
};
pub use notification::{
    NotificationHandle, NotificationOptions, NotificationPermission, Notifier,
    AUTO_CLOSE_AFTER,
};
pub use speech::{SpeechOptions, SpeechSynthesizer, Utterance, Voice};
pub use vibration::{VibrationPattern, Vibrator};

use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by capability operations
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The platform does not offer this capability
    #[error("{0} not supported")]
    NotSupported(&'static str),

    /// The platform reported a failure while using the capability
    #[error("{0}")]
    Platform(String),
}

/// Whether a platform feature is present
#[derive(Debug, Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Default for Capability<T> {
    fn default() -> Self {
        Capability::Unavailable
    }
}

impl<T> Capability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Capability::Available(inner) => Some(inner),
            Capability::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Capability::Available(inner),
            None => Capability::Unavailable,
        }
    }
}

/// The set of platform features available to the app
///
/// Built once at startup and passed to whatever needs to speak, buzz or
/// notify. Fields left [`Capability::Unavailable`] make the matching
/// operations degrade quietly.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub speech: Capability<Arc<dyn SpeechSynthesizer>>,
    pub vibration: Capability<Arc<dyn Vibrator>>,
    pub notifications: Capability<Arc<dyn Notifier>>,
    pub battery: Capability<Arc<dyn BatteryProvider>>,
    pub network: Capability<Arc<dyn NetworkInfoProvider>>,
    pub host: HostEnvironment,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("speech", &self.speech.is_available())
            .field("vibration", &self.vibration.is_available())
            .field("notifications", &self.notifications.is_available())
            .field("battery", &self.battery.is_available())
            .field("network", &self.network.is_available())
            .field("host", &self.host)
            .finish()
    }
}

impl Capabilities {
    /// No optional features, only the given host description
    pub fn headless(host: HostEnvironment) -> Self {
        Self {
            host,
            ..Self::default()
        }
    }
}
