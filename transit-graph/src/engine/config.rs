//! Query configuration for travel-time searches.

use chrono::Duration;

use crate::domain::{DecimalHours, TimeError, TransitError};

/// Parameters of a single travel-time query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Number of stops around the query location to start from.
    pub nearest_k: usize,

    /// Walking speed to the seed stops (distance units per hour).
    pub walk_speed: f64,

    /// Longest travel time to report (hours).
    /// Nodes further than this are not settled.
    pub max_time: f64,
}

impl QueryConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(nearest_k: usize, walk_speed: f64, max_time: f64) -> Self {
        Self {
            nearest_k,
            walk_speed,
            max_time,
        }
    }

    pub fn validate(&self) -> Result<(), TransitError> {
        if !(self.walk_speed.is_finite() && self.walk_speed > 0.0) {
            return Err(TransitError::InvalidConfig("walk_speed must be positive"));
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return Err(TransitError::InvalidConfig("max_time must not be negative"));
        }
        Ok(())
    }

    /// Returns the time budget as a Duration.
    pub fn max_time_duration(&self) -> Result<Duration, TimeError> {
        DecimalHours::new(self.max_time).map(DecimalHours::to_duration)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            nearest_k: 5,
            walk_speed: 1.5, // mph
            max_time: 1.0,   // 1 hour
        }
    }
}
