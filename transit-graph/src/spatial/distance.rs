//! Great-circle distance.
//!
//! The sphere radius sets the distance unit for the whole crate. The default
//! is the Earth's radius in miles, so walking speeds are in miles per hour
//! and transfer thresholds in miles.

use crate::domain::Coord;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.75;

/// Haversine distance between two coordinates on a sphere of radius `radius`.
///
/// Uses `r * acos(cos(Δlat) - cos(lat1)·cos(lat2)·(1 - cos(Δlon)))`. The
/// argument is clamped to [-1, 1]: rounding can push it just outside for
/// nearly coincident or antipodal points, and `acos` would return `NaN`.
pub fn haversine_distance(a: Coord, b: Coord, radius: f64) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat1 - lat2;
    let d_lon = a.lon.to_radians() - b.lon.to_radians();

    let cos_angle = d_lat.cos() - lat1.cos() * lat2.cos() * (1.0 - d_lon.cos());
    radius * cos_angle.clamp(-1.0, 1.0).acos()
}

/// A distance metric between coordinates.
///
/// The matcher and graph builder are generic over this so that tests can
/// observe how often distances are computed.
pub trait Distance: Sync {
    fn distance(&self, a: Coord, b: Coord) -> f64;
}

/// Haversine distance on a sphere of configurable radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Haversine {
    pub radius: f64,
}

impl Haversine {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for Haversine {
    fn default() -> Self {
        Self::new(EARTH_RADIUS_MILES)
    }
}

impl Distance for Haversine {
    fn distance(&self, a: Coord, b: Coord) -> f64 {
        haversine_distance(a, b, self.radius)
    }
}
