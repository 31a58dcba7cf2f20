//! Great-circle geometry for camera proximity
//!
//! Distance and initial bearing between two coordinates on a spherical Earth,
//! plus the eight-point compass lookup used for spoken and on-screen hints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other` in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(*self, *other)
    }

    /// Initial bearing towards `other` in degrees
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        bearing(*self, *other)
    }
}

/// Computes the great-circle distance between two coordinates in meters.
///
/// Uses the Haversine formula with a mean Earth radius of 6371 km. Precision
/// degrades for nearly antipodal points.
///
/// # Example
///
/// ```
/// use edsalert::geo::{distance, Coordinate};
///
/// let a = Coordinate::new(41.0, 29.0);
/// let b = Coordinate::new(42.0, 29.0);
/// let d = distance(a, b);
/// assert!((d - 111_195.0).abs() < 100.0);
/// ```
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Computes the initial bearing from `from` to `to`, normalized to `[0, 360)`.
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let theta = y.atan2(x);
    (theta.to_degrees() + 360.0) % 360.0
}

/// The eight principal compass points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Returns the nearest compass point for a bearing in degrees.
    ///
    /// Bearings halfway between two points round towards the clockwise one,
    /// so 22.5° is north-east.
    pub fn from_bearing(bearing: f64) -> Self {
        let index = (bearing / 45.0 + 0.5).floor().rem_euclid(8.0) as usize;
        Self::ALL[index]
    }

    /// Turkish display label
    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::North => "Kuzey",
            CompassDirection::NorthEast => "Kuzeydoğu",
            CompassDirection::East => "Doğu",
            CompassDirection::SouthEast => "Güneydoğu",
            CompassDirection::South => "Güney",
            CompassDirection::SouthWest => "Güneybatı",
            CompassDirection::West => "Batı",
            CompassDirection::NorthWest => "Kuzeybatı",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for `CompassDirection::from_bearing(bearing).label()`
pub fn direction_name(bearing: f64) -> &'static str {
    CompassDirection::from_bearing(bearing).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISTANBUL: Coordinate = Coordinate::new(41.0082, 28.9784);
    const ANKARA: Coordinate = Coordinate::new(39.9334, 32.8597);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance(ISTANBUL, ISTANBUL), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance(ISTANBUL, ANKARA);
        let back = distance(ANKARA, ISTANBUL);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance(a, b);
        assert!((d - 111_195.0).abs() < 50.0, "got {}", d);
    }

    #[test]
    fn test_istanbul_to_ankara_reference_distance() {
        let d = ISTANBUL.distance_to(&ANKARA);
        // Straight-line distance is roughly 350 km
        assert!(d > 345_000.0 && d < 355_000.0, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_points() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing(origin, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_is_normalized() {
        let b = ANKARA.bearing_to(&ISTANBUL);
        assert!((0.0..360.0).contains(&b));
        // Istanbul lies north-west of Ankara
        assert!(b > 270.0 && b < 360.0, "got {}", b);
    }

    #[test]
    fn test_direction_name_lookup() {
        assert_eq!(direction_name(0.0), "Kuzey");
        assert_eq!(direction_name(44.0), "Kuzeydoğu");
        assert_eq!(direction_name(90.0), "Doğu");
        assert_eq!(direction_name(180.0), "Güney");
        assert_eq!(direction_name(270.0), "Batı");
        assert_eq!(direction_name(350.0), "Kuzey");
    }

    #[test]
    fn test_direction_halfway_rounds_up() {
        assert_eq!(
            CompassDirection::from_bearing(22.5),
            CompassDirection::NorthEast
        );
        assert_eq!(
            CompassDirection::from_bearing(337.5),
            CompassDirection::North
        );
    }
}
