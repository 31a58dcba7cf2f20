//! Camera catalogue and driving-condition assessments
//!
//! Display metadata for each enforcement camera type, plus the GPS accuracy
//! and speed-limit classifications shown next to an approaching camera.

use serde::{Deserialize, Serialize};

/// Kinds of enforcement camera found in the location dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraType {
    /// Fixed speed camera (OHITS)
    Ohits,
    Mobile,
    Redlight,
    AverageSpeed,
    SectionControl,
    WeightControl,
    Tunnel,
    /// A tag the app has no metadata for
    #[serde(untagged)]
    Other(String),
}

impl CameraType {
    /// Parses the dataset tag, keeping unrecognized tags verbatim
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "OHITS" => CameraType::Ohits,
            "MOBILE" => CameraType::Mobile,
            "REDLIGHT" => CameraType::Redlight,
            "AVERAGE_SPEED" => CameraType::AverageSpeed,
            "SECTION_CONTROL" => CameraType::SectionControl,
            "WEIGHT_CONTROL" => CameraType::WeightControl,
            "TUNNEL" => CameraType::Tunnel,
            other => CameraType::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            CameraType::Ohits => "OHITS",
            CameraType::Mobile => "MOBILE",
            CameraType::Redlight => "REDLIGHT",
            CameraType::AverageSpeed => "AVERAGE_SPEED",
            CameraType::SectionControl => "SECTION_CONTROL",
            CameraType::WeightControl => "WEIGHT_CONTROL",
            CameraType::Tunnel => "TUNNEL",
            CameraType::Other(tag) => tag,
        }
    }

    /// Font Awesome icon class
    pub fn icon(&self) -> &'static str {
        match self {
            CameraType::Ohits => "fas fa-camera",
            CameraType::Mobile => "fas fa-car",
            CameraType::Redlight => "fas fa-traffic-light",
            CameraType::AverageSpeed => "fas fa-tachometer-alt",
            CameraType::SectionControl => "fas fa-road",
            CameraType::WeightControl => "fas fa-truck",
            CameraType::Tunnel => "fas fa-tunnel",
            CameraType::Other(_) => "fas fa-camera",
        }
    }

    /// Marker colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            CameraType::Ohits => "#ff4757",
            CameraType::Mobile => "#ffa502",
            CameraType::Redlight => "#ff3838",
            CameraType::AverageSpeed => "#ff6348",
            CameraType::SectionControl => "#ff7675",
            CameraType::WeightControl => "#a29bfe",
            CameraType::Tunnel => "#6c5ce7",
            CameraType::Other(_) => "#ff4757",
        }
    }

    /// Turkish display name; unknown types show their raw tag
    pub fn display_name(&self) -> &str {
        match self {
            CameraType::Ohits => "Sabit Hız Kamerası",
            CameraType::Mobile => "Mobil Radar",
            CameraType::Redlight => "Kırmızı Işık Kamerası",
            CameraType::AverageSpeed => "Ortalama Hız Kamerası",
            CameraType::SectionControl => "Kesit Kontrol",
            CameraType::WeightControl => "Ağırlık Kontrolü",
            CameraType::Tunnel => "Tünel Kamerası",
            CameraType::Other(tag) => tag,
        }
    }
}

/// Quality bands for a reported GPS accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsAccuracyLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

/// Result of [`assess_gps_accuracy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpsAccuracy {
    pub level: GpsAccuracyLevel,
    /// Turkish label
    pub text: &'static str,
    pub color: &'static str,
}

/// Classifies a GPS accuracy radius given in meters.
pub fn assess_gps_accuracy(accuracy_m: f64) -> GpsAccuracy {
    let (level, text, color) = if accuracy_m <= 5.0 {
        (GpsAccuracyLevel::Excellent, "Mükemmel", "#2ed573")
    } else if accuracy_m <= 10.0 {
        (GpsAccuracyLevel::Good, "İyi", "#26d0ce")
    } else if accuracy_m <= 20.0 {
        (GpsAccuracyLevel::Fair, "Orta", "#ffa502")
    } else if accuracy_m <= 50.0 {
        (GpsAccuracyLevel::Poor, "Zayıf", "#ff6348")
    } else {
        (GpsAccuracyLevel::VeryPoor, "Çok Zayıf", "#ff4757")
    };

    GpsAccuracy { level, text, color }
}

/// Tolerance above the limit before an overspeed counts as a violation
pub const DEFAULT_SPEED_TOLERANCE: f64 = 5.0;

/// Severity bands for driving over a speed limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationLevel {
    Safe,
    Warning,
    Minor,
    Major,
    Severe,
}

/// Result of [`check_speed_violation`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedCheck {
    pub violation: bool,
    pub level: ViolationLevel,
    /// km/h over the limit, zero when within it
    pub excess: f64,
}

/// Compares the current speed against a limit, both in km/h.
///
/// Speeds within `tolerance` of the limit only warn; anything beyond is a
/// violation graded minor (≤ +10), major (≤ +20) or severe.
pub fn check_speed_violation(current: f64, limit: f64, tolerance: f64) -> SpeedCheck {
    let excess = current - limit;

    if current <= limit {
        SpeedCheck {
            violation: false,
            level: ViolationLevel::Safe,
            excess: 0.0,
        }
    } else if current <= limit + tolerance {
        SpeedCheck {
            violation: false,
            level: ViolationLevel::Warning,
            excess,
        }
    } else {
        let level = if current <= limit + 10.0 {
            ViolationLevel::Minor
        } else if current <= limit + 20.0 {
            ViolationLevel::Major
        } else {
            ViolationLevel::Severe
        };
        SpeedCheck {
            violation: true,
            level,
            excess,
        }
    }
}
