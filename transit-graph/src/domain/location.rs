//! Geographic coordinates and query locations.

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Where and when a query starts.
///
/// `time` is in decimal hours on the same axis as visit departure times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub coord: Coord,
    pub time: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64, time: f64) -> Self {
        Self {
            coord: Coord::new(lat, lon),
            time,
        }
    }
}
