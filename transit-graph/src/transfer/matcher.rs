//! Spatial-temporal transfer matching.
//!
//! Finds the visits a rider could walk to and board after alighting from a
//! given visit. Filters run cheapest first, and each one only narrows the
//! candidate set:
//!
//! 1. coarse: another route, departing within an hour either side;
//! 2. spatial: geodesic distance under `dist_threshold`;
//! 3. temporal: after walking and the safety margin, the wait is in
//!    `(0, max_wait)`.
//!
//! No distance is computed when the coarse filter leaves nothing.

use std::sync::Arc;

use tracing::trace;

use super::TransferConfig;
use crate::domain::{TransitError, Visit};
use crate::schedule::VisitStore;
use crate::spatial::{Distance, Haversine};

/// Half-width of the coarse departure-time window (hours).
pub const COARSE_TIME_BUFFER: f64 = 1.0;

/// A visit reachable by a walking transfer, with the wait on arrival.
#[derive(Debug, Clone)]
pub struct TransferCandidate<'a> {
    pub visit: &'a Arc<Visit>,
    /// Distance walked between the two stops.
    pub distance: f64,
    /// Time between arriving on foot and the candidate's departure (hours).
    pub wait: f64,
}

/// Matches visits against a visit store.
pub struct SpatialTemporalMatcher<'a, D = Haversine> {
    store: &'a VisitStore,
    metric: D,
}

impl<'a> SpatialTemporalMatcher<'a> {
    /// Create a matcher using the store's own sphere radius.
    pub fn new(store: &'a VisitStore) -> Self {
        Self {
            store,
            metric: store.config().metric(),
        }
    }
}

impl<'a, D: Distance> SpatialTemporalMatcher<'a, D> {
    /// Create a matcher with a custom distance metric.
    pub fn with_metric(store: &'a VisitStore, metric: D) -> Self {
        Self { store, metric }
    }

    /// Returns the distance metric.
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Visits that are valid transfer targets from `visit`.
    pub fn nearby_visits(
        &self,
        visit: &Visit,
        config: &TransferConfig,
    ) -> Result<Vec<&'a Arc<Visit>>, TransitError> {
        Ok(self
            .transfer_candidates(visit, config)?
            .into_iter()
            .map(|c| c.visit)
            .collect())
    }

    /// Valid transfer targets from `visit`, with walk distance and wait.
    ///
    /// Fails with `InvalidConfig` if `config` is out of range, and with
    /// `InvalidVisit` if `visit` lacks a finite time, valid coordinates or a
    /// route.
    pub fn transfer_candidates(
        &self,
        visit: &Visit,
        config: &TransferConfig,
    ) -> Result<Vec<TransferCandidate<'a>>, TransitError> {
        config.validate()?;
        visit.validate()?;

        let coarse: Vec<&'a Arc<Visit>> = self
            .store
            .visits_near_time(visit.departure_time, COARSE_TIME_BUFFER)
            .filter(|c| c.route_id != visit.route_id)
            .collect();
        if coarse.is_empty() {
            return Ok(Vec::new());
        }

        let origin = visit.coord();
        let near: Vec<(&'a Arc<Visit>, f64)> = coarse
            .into_iter()
            .map(|c| (c, self.metric.distance(origin, c.coord())))
            .filter(|(_, d)| *d < config.dist_threshold)
            .collect();
        if near.is_empty() {
            return Ok(Vec::new());
        }

        let candidates: Vec<TransferCandidate<'a>> = near
            .into_iter()
            .filter_map(|(c, distance)| {
                let arrival_time =
                    visit.departure_time + distance / config.walk_speed + config.time_safety;
                let wait = c.departure_time - arrival_time;
                (wait > 0.0 && wait < config.max_wait).then_some(TransferCandidate {
                    visit: c,
                    distance,
                    wait,
                })
            })
            .collect();

        trace!(
            visit = %visit.visit_id,
            transfers = candidates.len(),
            "matched transfers"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coord, RouteId, StopId, TripId};
    use crate::schedule::ScheduleConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts distance evaluations.
    #[derive(Default)]
    struct CountingDistance {
        calls: AtomicUsize,
    }

    impl CountingDistance {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Distance for CountingDistance {
        fn distance(&self, a: Coord, b: Coord) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Haversine::default().distance(a, b)
        }
    }

    const HERE: Coord = Coord {
        lat: 36.9741,
        lon: -122.0308,
    };
    // About 0.03 miles north of HERE
    const NEARBY: Coord = Coord {
        lat: 36.9745,
        lon: -122.0308,
    };
    // About 0.7 miles north of HERE
    const FAR: Coord = Coord {
        lat: 36.9841,
        lon: -122.0308,
    };

    fn visit(trip: &str, route: &str, stop: &str, seq: u32, time: f64, at: Coord) -> Visit {
        Visit::new(
            TripId::new(trip),
            StopId::new(stop),
            seq,
            RouteId::new(route),
            time,
            at,
            stop,
            "",
        )
    }

    fn store(visits: Vec<Visit>) -> VisitStore {
        VisitStore::new(visits, ScheduleConfig::new("", crate::spatial::EARTH_RADIUS_MILES)).unwrap()
    }

    fn no_safety() -> TransferConfig {
        TransferConfig::new(1.5, 10.0 / 60.0, 0.0, 0.05)
    }

    #[test]
    fn same_stop_transfer_wait_is_time_difference() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![from.clone(), visit("T2", "20", "S", 1, 8.1, HERE)]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let found = matcher.transfer_candidates(&from, &no_safety()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].visit.visit_id.as_str(), "T2_1");
        assert_eq!(found[0].distance, 0.0);
        assert!((found[0].wait - 0.1).abs() < 1e-12);
    }

    #[test]
    fn excludes_same_route() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![from.clone(), visit("T2", "10", "S", 1, 8.1, HERE)]);
        let matcher = SpatialTemporalMatcher::new(&store);

        assert!(matcher.nearby_visits(&from, &no_safety()).unwrap().is_empty());
    }

    #[test]
    fn excludes_distant_stops() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![from.clone(), visit("T2", "20", "F", 1, 8.1, FAR)]);
        let matcher = SpatialTemporalMatcher::new(&store);

        assert!(matcher.nearby_visits(&from, &no_safety()).unwrap().is_empty());
    }

    #[test]
    fn walking_time_is_charged() {
        // 0.03 miles at 1.5 mph is about 1.1 minutes; a departure 1 minute later is missed
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            visit("T2", "20", "N", 1, 8.0 + 1.0 / 60.0, NEARBY),
            visit("T3", "30", "N", 1, 8.0 + 2.0 / 60.0, NEARBY),
        ]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let found = matcher.transfer_candidates(&from, &no_safety()).unwrap();
        let ids: Vec<_> = found.iter().map(|c| c.visit.visit_id.as_str()).collect();
        assert_eq!(ids, ["T3_1"]);
        let expected_wait = 2.0 / 60.0 - found[0].distance / 1.5;
        assert!((found[0].wait - expected_wait).abs() < 1e-12);
    }

    #[test]
    fn safety_margin_is_charged() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            visit("T2", "20", "S", 1, 8.0 + 2.0 / 60.0, HERE),
            visit("T3", "30", "S", 1, 8.0 + 5.0 / 60.0, HERE),
        ]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let found = matcher
            .nearby_visits(&from, &TransferConfig::default())
            .unwrap();
        let ids: Vec<_> = found.iter().map(|v| v.visit_id.as_str()).collect();
        assert_eq!(ids, ["T3_1"]);
    }

    #[test]
    fn wait_must_be_under_max_wait() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            visit("T2", "20", "S", 1, 8.0 + 9.0 / 60.0, HERE),
            visit("T3", "30", "S", 1, 8.0 + 11.0 / 60.0, HERE),
        ]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let found = matcher.nearby_visits(&from, &no_safety()).unwrap();
        let ids: Vec<_> = found.iter().map(|v| v.visit_id.as_str()).collect();
        assert_eq!(ids, ["T2_1"]);
    }

    #[test]
    fn earlier_departures_are_not_transfers() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            visit("T2", "20", "S", 1, 7.95, HERE),
            visit("T3", "30", "S", 1, 8.0, HERE),
        ]);
        let matcher = SpatialTemporalMatcher::new(&store);

        assert!(matcher.nearby_visits(&from, &no_safety()).unwrap().is_empty());
    }

    #[test]
    fn empty_coarse_set_skips_distance() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            // Same route: removed by the coarse filter
            visit("T2", "10", "S", 1, 8.05, HERE),
            // Other route, but more than an hour away
            visit("T3", "20", "S", 1, 9.5, HERE),
        ]);
        let matcher = SpatialTemporalMatcher::with_metric(&store, CountingDistance::default());

        let found = matcher.nearby_visits(&from, &no_safety()).unwrap();
        assert!(found.is_empty());
        assert_eq!(matcher.metric().calls(), 0);
    }

    #[test]
    fn distance_computed_once_per_coarse_candidate() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![
            from.clone(),
            visit("T2", "20", "S", 1, 8.05, HERE),
            visit("T3", "30", "F", 1, 8.05, FAR),
            visit("T4", "40", "S", 1, 9.5, HERE),
        ]);
        let matcher = SpatialTemporalMatcher::with_metric(&store, CountingDistance::default());

        let found = matcher.nearby_visits(&from, &no_safety()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(matcher.metric().calls(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let from = visit("T1", "10", "S", 1, 8.0, HERE);
        let store = store(vec![from.clone(), visit("T2", "20", "S", 1, 8.1, HERE)]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let config = TransferConfig::new(0.0, 10.0 / 60.0, 0.0, 0.05);
        let err = matcher.transfer_candidates(&from, &config).unwrap_err();
        assert!(matches!(err, TransitError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_visit_fails_fast() {
        let good = visit("T2", "20", "S", 1, 8.1, HERE);
        let store = store(vec![good]);
        let matcher = SpatialTemporalMatcher::new(&store);

        let mut bad = visit("T1", "10", "S", 1, 8.0, HERE);
        bad.stop_lat = f64::NAN;
        let err = matcher.nearby_visits(&bad, &no_safety()).unwrap_err();
        assert!(matches!(err, TransitError::InvalidVisit { .. }));
    }
}
