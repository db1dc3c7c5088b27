//! Scheduled stop events.

use super::{Coord, RouteId, StopId, TransitError, TripId, VisitId};

/// One scheduled stop event: a trip calling at a stop at a given time.
///
/// A visit is a node of the time-expanded graph. `visit_id` is derived from
/// `trip_id` and `stop_sequence`, so it is unique whenever the
/// (trip, sequence) pairs are.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub visit_id: VisitId,
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub route_id: RouteId,
    /// Decimal hours since the start of the service day; may exceed 24.
    pub departure_time: f64,
    pub stop_lat: f64,
    pub stop_lon: f64,
    pub stop_name: String,
    pub trip_headsign: String,
}

impl Visit {
    /// Create a visit, deriving its id from the trip and sequence.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trip_id: TripId,
        stop_id: StopId,
        stop_sequence: u32,
        route_id: RouteId,
        departure_time: f64,
        coord: Coord,
        stop_name: impl Into<String>,
        trip_headsign: impl Into<String>,
    ) -> Self {
        Self {
            visit_id: VisitId::derive(&trip_id, stop_sequence),
            trip_id,
            stop_id,
            stop_sequence,
            route_id,
            departure_time,
            stop_lat: coord.lat,
            stop_lon: coord.lon,
            stop_name: stop_name.into(),
            trip_headsign: trip_headsign.into(),
        }
    }

    /// Returns the stop coordinates.
    pub fn coord(&self) -> Coord {
        Coord::new(self.stop_lat, self.stop_lon)
    }

    /// Check the fields the transfer matcher depends on.
    ///
    /// A visit that fails here would otherwise produce `NaN` distances or
    /// times and silently lose edges.
    pub fn validate(&self) -> Result<(), TransitError> {
        let reason = if !self.departure_time.is_finite() {
            Some("departure time is not finite")
        } else if !self.coord().is_valid() {
            Some("stop coordinates are missing or out of range")
        } else if self.route_id.as_str().is_empty() {
            Some("route id is empty")
        } else if self.stop_id.as_str().is_empty() {
            Some("stop id is empty")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(TransitError::InvalidVisit {
                visit_id: self.visit_id.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
