//! Display formatting for distances, durations and speeds
//!
//! All formatters are deterministic and use fixed, locale-independent labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rounds half-way values towards positive infinity.
///
/// Display values are rounded this way throughout the app, so 2.5 becomes 3
/// and -2.5 becomes -2. Values just below a half, such as
/// `0.49999999999999994`, still round down.
pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if (rounded - value).abs() == 0.5 {
        value.ceil()
    } else {
        rounded
    }
}

/// Formats `value` with exactly `precision` decimals, rounding ties up.
///
/// `format!("{:.1}", 1.25)` rounds ties to even and prints `1.2`; this
/// prints `1.3`.
///
/// # Arguments
/// * `value` - The number to format
/// * `precision` - Digits after the decimal point
pub fn to_fixed(value: f64, precision: usize) -> String {
    let scale = 10f64.powi(precision as i32);
    let rounded = round_half_up(value * scale) / scale;
    format!("{:.*}", precision, rounded)
}

/// Formats a distance in meters for display.
///
/// * Below 1 km: whole meters, e.g. `"500m"`
/// * Below 10 km: kilometers with `precision` decimals, e.g. `"1.5km"`
/// * Otherwise: whole kilometers, e.g. `"15km"`
pub fn format_distance(meters: f64, precision: usize) -> String {
    if meters < 1000.0 {
        format!("{}m", round_half_up(meters))
    } else if meters < 10_000.0 {
        format!("{}km", to_fixed(meters / 1000.0, precision))
    } else {
        format!("{}km", round_half_up(meters / 1000.0))
    }
}

/// Formats an elapsed time given in seconds.
///
/// Durations of an hour or more render as `HH:MM:SS`. Shorter durations
/// render as `MM:SS`, or `MM:SS.mmm` when `include_millis` is set.
pub fn format_time(seconds: f64, include_millis: bool) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds % 1.0) * 1000.0).floor() as u64;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else if include_millis {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Units a speed can be displayed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
}

/// Returned when a speed unit name is not recognized
#[derive(Debug, Error)]
#[error("Unknown speed unit: '{0}'. Valid units: kmh, ms, mph")]
pub struct UnknownSpeedUnit(pub String);

impl FromStr for SpeedUnit {
    type Err = UnknownSpeedUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kmh" => Ok(SpeedUnit::Kmh),
            "ms" => Ok(SpeedUnit::Ms),
            "mph" => Ok(SpeedUnit::Mph),
            other => Err(UnknownSpeedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeedUnit::Kmh => "kmh",
            SpeedUnit::Ms => "ms",
            SpeedUnit::Mph => "mph",
        };
        f.write_str(name)
    }
}

/// Formats a speed given in km/h in the requested unit.
pub fn format_speed(speed_kmh: f64, unit: SpeedUnit) -> String {
    match unit {
        SpeedUnit::Kmh => format!("{} km/h", round_half_up(speed_kmh)),
        SpeedUnit::Ms => format!("{} m/s", to_fixed(speed_kmh / 3.6, 1)),
        SpeedUnit::Mph => format!("{} mph", round_half_up(speed_kmh * 0.621371)),
    }
}

/// Like [`format_speed`], but takes the unit by name.
///
/// An unrecognized unit yields the bare number.
pub fn format_speed_named(speed_kmh: f64, unit: &str) -> String {
    match unit.parse::<SpeedUnit>() {
        Ok(unit) => format_speed(speed_kmh, unit),
        Err(_) => speed_kmh.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_thresholds() {
        assert_eq!(format_distance(500.0, 1), "500m");
        assert_eq!(format_distance(1500.0, 1), "1.5km");
        assert_eq!(format_distance(15000.0, 1), "15km");
    }

    #[test]
    fn test_format_distance_rounding() {
        assert_eq!(format_distance(999.4, 1), "999m");
        assert_eq!(format_distance(0.5, 1), "1m");
        assert_eq!(format_distance(2346.0, 2), "2.35km");
        assert_eq!(format_distance(10_500.0, 1), "11km");
    }

    #[test]
    fn test_format_distance_rounds_ties_up() {
        assert_eq!(format_distance(1250.0, 1), "1.3km");
        assert_eq!(format_distance(1750.0, 1), "1.8km");
        assert_eq!(format_distance(3250.0, 1), "3.3km");
        assert_eq!(format_distance(2500.0, 0), "3km");
        assert_eq!(format_distance(3125.0, 2), "3.13km");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(1.4), 1.0);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.0, 2), "2.00");
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_format_time_with_hours() {
        assert_eq!(format_time(3661.0, false), "01:01:01");
        assert_eq!(format_time(3661.0, true), "01:01:01");
    }

    #[test]
    fn test_format_time_minutes() {
        assert_eq!(format_time(65.0, false), "01:05");
        assert_eq!(format_time(65.0, true), "01:05.000");
        assert_eq!(format_time(0.0, false), "00:00");
    }

    #[test]
    fn test_format_time_millis() {
        assert_eq!(format_time(5.25, true), "00:05.250");
    }

    #[test]
    fn test_format_speed_units() {
        assert_eq!(format_speed(90.0, SpeedUnit::Kmh), "90 km/h");
        assert_eq!(format_speed(90.0, SpeedUnit::Ms), "25.0 m/s");
        assert_eq!(format_speed(100.0, SpeedUnit::Mph), "62 mph");
    }

    #[test]
    fn test_format_speed_ms_rounds_ties_up() {
        assert_eq!(format_speed(0.9, SpeedUnit::Ms), "0.3 m/s");
        assert_eq!(format_speed(9.0, SpeedUnit::Ms), "2.5 m/s");
    }

    #[test]
    fn test_format_speed_named_unknown_unit() {
        assert_eq!(format_speed_named(72.0, "knots"), "72");
        assert_eq!(format_speed_named(72.0, "kmh"), "72 km/h");
    }

    #[test]
    fn test_speed_unit_parse() {
        assert_eq!("mph".parse::<SpeedUnit>().unwrap(), SpeedUnit::Mph);
        let err = "furlongs".parse::<SpeedUnit>().unwrap_err();
        assert!(err.to_string().contains("furlongs"));
    }
}
