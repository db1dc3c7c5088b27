//! Transfer matching configuration.

use chrono::Duration;

use crate::domain::{DecimalHours, TimeError, TransitError};

/// Parameters deciding which visits are reachable by a walking transfer.
///
/// Times are decimal hours and distances use the unit of the schedule's
/// sphere radius (miles by default).
#[derive(Debug, Clone, PartialEq)]
pub struct TransferConfig {
    /// Walking speed (distance units per hour).
    pub walk_speed: f64,

    /// Longest acceptable wait at the transfer stop (hours).
    /// The wait must be strictly shorter than this.
    pub max_wait: f64,

    /// Slack added to every walk (hours).
    pub time_safety: f64,

    /// Furthest a rider will walk to transfer.
    pub dist_threshold: f64,
}

impl TransferConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(walk_speed: f64, max_wait: f64, time_safety: f64, dist_threshold: f64) -> Self {
        Self {
            walk_speed,
            max_wait,
            time_safety,
            dist_threshold,
        }
    }

    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), TransitError> {
        if !(self.walk_speed.is_finite() && self.walk_speed > 0.0) {
            return Err(TransitError::InvalidConfig("walk_speed must be positive"));
        }
        if !(self.max_wait.is_finite() && self.max_wait > 0.0) {
            return Err(TransitError::InvalidConfig("max_wait must be positive"));
        }
        if !(self.time_safety.is_finite() && self.time_safety >= 0.0) {
            return Err(TransitError::InvalidConfig("time_safety must not be negative"));
        }
        if !(self.dist_threshold.is_finite() && self.dist_threshold >= 0.0) {
            return Err(TransitError::InvalidConfig(
                "dist_threshold must not be negative",
            ));
        }
        Ok(())
    }

    /// Returns the maximum wait as a Duration.
    pub fn max_wait_duration(&self) -> Result<Duration, TimeError> {
        DecimalHours::new(self.max_wait).map(DecimalHours::to_duration)
    }

    /// Returns the safety margin as a Duration.
    pub fn time_safety_duration(&self) -> Result<Duration, TimeError> {
        DecimalHours::new(self.time_safety).map(DecimalHours::to_duration)
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,          // mph
            max_wait: 10.0 / 60.0,    // 10 minutes
            time_safety: 3.0 / 60.0,  // 3 minutes
            dist_threshold: 0.05,     // miles
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TransferConfig::default();

        assert_eq!(config.walk_speed, 1.5);
        assert_eq!(config.max_wait, 10.0 / 60.0);
        assert_eq!(config.time_safety, 3.0 / 60.0);
        assert_eq!(config.dist_threshold, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duration_methods() {
        let config = TransferConfig::default();

        assert_eq!(config.max_wait_duration(), Ok(Duration::minutes(10)));
        assert_eq!(config.time_safety_duration(), Ok(Duration::minutes(3)));

        let bad = TransferConfig::new(1.5, f64::NAN, -0.1, 0.05);
        assert!(bad.max_wait_duration().is_err());
        assert!(bad.time_safety_duration().is_err());
    }

    #[test]
    fn custom_config() {
        let config = TransferConfig::new(3.0, 0.5, 0.0, 0.25);

        assert_eq!(config.walk_speed, 3.0);
        assert_eq!(config.max_wait, 0.5);
        assert_eq!(config.time_safety, 0.0);
        assert_eq!(config.dist_threshold, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(TransferConfig::new(0.0, 0.5, 0.0, 0.1).validate().is_err());
        assert!(TransferConfig::new(1.5, 0.0, 0.0, 0.1).validate().is_err());
        assert!(TransferConfig::new(1.5, 0.5, -0.1, 0.1).validate().is_err());
        assert!(TransferConfig::new(1.5, 0.5, 0.0, f64::NAN).validate().is_err());
    }
}
