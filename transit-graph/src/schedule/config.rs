//! Schedule loading configuration.

use crate::domain::TransitError;
use crate::spatial::{EARTH_RADIUS_MILES, Haversine};

/// Parameters for turning raw timetable records into a visit store.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Service-day predicate: only trips whose id contains this substring
    /// are loaded. An empty filter keeps every trip.
    pub day_filter: String,

    /// Sphere radius for geodesic distances. Sets the distance unit.
    pub earth_radius: f64,
}

impl ScheduleConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(day_filter: impl Into<String>, earth_radius: f64) -> Self {
        Self {
            day_filter: day_filter.into(),
            earth_radius,
        }
    }

    /// Returns the distance metric implied by `earth_radius`.
    pub fn metric(&self) -> Haversine {
        Haversine::new(self.earth_radius)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), TransitError> {
        if !(self.earth_radius.is_finite() && self.earth_radius > 0.0) {
            return Err(TransitError::InvalidConfig("earth_radius must be positive"));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_filter: "Weekday".to_string(),
            earth_radius: EARTH_RADIUS_MILES,
        }
    }
}

/// Whether a trip id matches a service-day filter.
pub fn matches_day(trip_id: &str, day_filter: &str) -> bool {
    trip_id.contains(day_filter)
}
