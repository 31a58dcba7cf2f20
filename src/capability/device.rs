//! Device, battery and connection introspection

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Capabilities, CapabilityError, Capability};
use crate::format::round_half_up;

static MOBILE_UA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("mobile user-agent pattern is valid")
});
static IPAD_UA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)iPad").expect("iPad user-agent pattern is valid"));
static IOS_UA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"iPad|iPhone|iPod").expect("iOS user-agent pattern is valid"));
static ANDROID_UA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Android").expect("Android user-agent pattern is valid"));

/// Screen dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
}

/// Static facts about the host that are not injected capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEnvironment {
    pub user_agent: String,
    pub platform: String,
    pub screen: ScreenInfo,
    pub has_touch: bool,
    pub has_geolocation: bool,
    pub has_service_worker: bool,
}

/// Device classification and feature summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub is_mobile: bool,
    pub is_tablet: bool,
    #[serde(rename = "isIOS")]
    pub is_ios: bool,
    pub is_android: bool,
    pub platform: String,
    pub has_touch: bool,
    pub has_vibration: bool,
    pub has_geolocation: bool,
    pub has_notifications: bool,
    pub has_speech_synthesis: bool,
    pub has_service_worker: bool,
    pub screen: ScreenInfo,
}

impl DeviceInfo {
    /// Classifies a user-agent string; feature flags are left off
    pub fn from_user_agent(user_agent: &str, platform: &str) -> Self {
        Self {
            is_mobile: MOBILE_UA.is_match(user_agent),
            is_tablet: is_tablet(user_agent),
            is_ios: IOS_UA.is_match(user_agent),
            is_android: ANDROID_UA.is_match(user_agent),
            platform: platform.to_string(),
            has_touch: false,
            has_vibration: false,
            has_geolocation: false,
            has_notifications: false,
            has_speech_synthesis: false,
            has_service_worker: false,
            screen: ScreenInfo::default(),
        }
    }
}

/// iPads, and Android devices that do not advertise "Mobile" after the
/// Android token
fn is_tablet(user_agent: &str) -> bool {
    if IPAD_UA.is_match(user_agent) {
        return true;
    }
    let lower = user_agent.to_lowercase();
    match lower.rfind("android") {
        Some(idx) => !lower[idx + "android".len()..].contains("mobile"),
        None => false,
    }
}

/// Raw battery readings as the platform reports them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    /// Charge between 0.0 and 1.0
    pub level: f64,
    pub charging: bool,
    /// Seconds until full, infinite when discharging
    pub charging_time: f64,
    /// Seconds until empty, infinite when charging
    pub discharging_time: f64,
}

/// Battery summary for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    /// Charge percentage, 0-100
    pub level: u8,
    pub charging: bool,
    pub charging_time: f64,
    pub discharging_time: f64,
}

impl From<BatteryStatus> for BatteryInfo {
    fn from(status: BatteryStatus) -> Self {
        Self {
            level: round_half_up(status.level.clamp(0.0, 1.0) * 100.0) as u8,
            charging: status.charging,
            charging_time: status.charging_time,
            discharging_time: status.discharging_time,
        }
    }
}

#[async_trait]
pub trait BatteryProvider: Send + Sync {
    async fn status(&self) -> Result<BatteryStatus, CapabilityError>;
}

/// Connection quality as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// `slow-2g`, `2g`, `3g` or `4g`
    pub effective_type: String,
    /// Estimated bandwidth in Mbit/s
    pub downlink: f64,
    /// Estimated round-trip time in milliseconds
    pub rtt: u32,
    pub save_data: bool,
}

pub trait NetworkInfoProvider: Send + Sync {
    fn connection(&self) -> NetworkInfo;
}

impl Capabilities {
    /// Battery summary, or `None` if unavailable or the reading failed
    pub async fn battery_info(&self) -> Option<BatteryInfo> {
        let Capability::Available(provider) = &self.battery else {
            return None;
        };

        match provider.status().await {
            Ok(status) => Some(status.into()),
            Err(e) => {
                warn!(error = %e, "Battery API error");
                None
            }
        }
    }

    pub fn network_info(&self) -> Option<NetworkInfo> {
        self.network.get().map(|provider| provider.connection())
    }

    /// Classifies the host device and lists which features it has
    pub fn device_info(&self) -> DeviceInfo {
        let host = &self.host;
        DeviceInfo {
            has_touch: host.has_touch,
            has_vibration: self.vibration.is_available(),
            has_geolocation: host.has_geolocation,
            has_notifications: self.notifications.is_available(),
            has_speech_synthesis: self.speech.is_available(),
            has_service_worker: host.has_service_worker,
            screen: host.screen,
            ..DeviceInfo::from_user_agent(&host.user_agent, &host.platform)
        }
    }
}
