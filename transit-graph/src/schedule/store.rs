//! The visit store: every scheduled stop event, indexed for the graph builder.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info};

use super::config::{ScheduleConfig, matches_day};
use super::records::{RawSchedule, StopRecord, TripRecord};
use crate::domain::{Coord, DecimalHours, RouteId, StopId, TransitError, TripId, Visit, VisitId};

/// A distinct stop referenced by at least one visit.
#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub stop_id: StopId,
    pub stop_name: String,
    pub coord: Coord,
}

/// Immutable collection of visits with lookups by trip, time and stop.
///
/// Visits are held in (trip, stop_sequence) order, so each trip occupies a
/// contiguous range. A second index orders visits by departure time for
/// windowed queries.
#[derive(Debug)]
pub struct VisitStore {
    config: ScheduleConfig,
    visits: Vec<Arc<Visit>>,
    by_id: HashMap<VisitId, usize>,
    by_trip: HashMap<TripId, Range<usize>>,
    by_time: Vec<usize>,
    stops: Vec<StopInfo>,
}

impl VisitStore {
    /// Index a set of visits.
    ///
    /// Visits whose trip does not match `config.day_filter` are dropped.
    /// Fails with `DataIntegrity` if two visits share a `visit_id`.
    pub fn new(mut visits: Vec<Visit>, config: ScheduleConfig) -> Result<Self, TransitError> {
        config.validate()?;

        visits.retain(|v| matches_day(v.trip_id.as_str(), &config.day_filter));
        visits.sort_by(|a, b| {
            a.trip_id
                .cmp(&b.trip_id)
                .then(a.stop_sequence.cmp(&b.stop_sequence))
        });
        let visits: Vec<Arc<Visit>> = visits.into_iter().map(Arc::new).collect();

        let mut by_id = HashMap::with_capacity(visits.len());
        for (idx, visit) in visits.iter().enumerate() {
            if by_id.insert(visit.visit_id.clone(), idx).is_some() {
                return Err(TransitError::DataIntegrity(format!(
                    "duplicate visit id {}",
                    visit.visit_id
                )));
            }
        }

        let mut by_trip = HashMap::new();
        let mut start = 0;
        for idx in 1..=visits.len() {
            if idx == visits.len() || visits[idx].trip_id != visits[start].trip_id {
                by_trip.insert(visits[start].trip_id.clone(), start..idx);
                start = idx;
            }
        }

        let mut by_time: Vec<usize> = (0..visits.len()).collect();
        by_time.sort_by(|&a, &b| visits[a].departure_time.total_cmp(&visits[b].departure_time));

        let mut stops = BTreeMap::new();
        for visit in &visits {
            stops.entry(visit.stop_id.clone()).or_insert_with(|| StopInfo {
                stop_id: visit.stop_id.clone(),
                stop_name: visit.stop_name.clone(),
                coord: visit.coord(),
            });
        }

        debug!(
            visits = visits.len(),
            trips = by_trip.len(),
            stops = stops.len(),
            "indexed visit store"
        );

        Ok(Self {
            config,
            visits,
            by_id,
            by_trip,
            by_time,
            stops: stops.into_values().collect(),
        })
    }

    /// Join raw stop-time, stop and trip records into visits.
    ///
    /// Stop-times for trips outside the day filter are skipped before the
    /// join. Fails with `DataIntegrity` on a dangling stop or trip reference
    /// or a duplicate id, and with `Format` on an unparsable departure time
    /// or unusable stop coordinates.
    pub fn from_records(raw: &RawSchedule, config: &ScheduleConfig) -> Result<Self, TransitError> {
        let stops = index_stops(&raw.stops)?;
        let trips = index_trips(&raw.trips)?;

        let mut visits = Vec::with_capacity(raw.stop_times.len());
        for (row, st) in raw.stop_times.iter().enumerate() {
            if !matches_day(&st.trip_id, &config.day_filter) {
                continue;
            }
            let context = || {
                format!(
                    "stop_time {} (trip {}, stop_sequence {})",
                    row + 1,
                    st.trip_id,
                    st.stop_sequence
                )
            };

            let (stop_id, stop) = stops.get(st.stop_id.as_str()).ok_or_else(|| {
                TransitError::DataIntegrity(format!("{}: unknown stop_id {}", context(), st.stop_id))
            })?;
            let (trip_id, route_id, trip) = trips.get(st.trip_id.as_str()).ok_or_else(|| {
                TransitError::DataIntegrity(format!("{}: unknown trip_id {}", context(), st.trip_id))
            })?;
            let departure =
                DecimalHours::parse_hms(&st.departure_time).map_err(|e| TransitError::Format {
                    context: context(),
                    message: e.to_string(),
                })?;

            visits.push(Visit::new(
                trip_id.clone(),
                stop_id.clone(),
                st.stop_sequence,
                route_id.clone(),
                departure.hours(),
                Coord::new(stop.stop_lat, stop.stop_lon),
                stop.stop_name.clone(),
                trip.trip_headsign.clone(),
            ));
        }

        info!(
            stop_times = raw.stop_times.len(),
            visits = visits.len(),
            day_filter = %config.day_filter,
            "joined schedule records"
        );

        Self::new(visits, config.clone())
    }

    /// Returns the configuration the store was built with.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Returns the service-day filter the store was built with.
    pub fn day_filter(&self) -> &str {
        &self.config.day_filter
    }

    /// Distinct trips whose id matches `day_filter`.
    pub fn trips(&self, day_filter: &str) -> BTreeSet<TripId> {
        self.by_trip
            .keys()
            .filter(|trip| matches_day(trip.as_str(), day_filter))
            .cloned()
            .collect()
    }

    /// Visits of one trip, in ascending `stop_sequence` order.
    pub fn visits_for_trip(&self, trip_id: &TripId) -> Result<&[Arc<Visit>], TransitError> {
        self.by_trip
            .get(trip_id)
            .map(|range| &self.visits[range.clone()])
            .ok_or_else(|| TransitError::NotFound(format!("trip {}", trip_id)))
    }

    /// Visits departing strictly between `min_time` and `max_time` at any of
    /// `at_stops`, in departure order.
    pub fn visits_in_window(
        &self,
        min_time: f64,
        max_time: f64,
        at_stops: &HashSet<StopId>,
    ) -> Vec<&Arc<Visit>> {
        self.time_window(min_time, max_time)
            .filter(|v| at_stops.contains(&v.stop_id))
            .collect()
    }

    /// Visits departing strictly within `half_width` hours of `center`.
    pub fn visits_near_time(
        &self,
        center: f64,
        half_width: f64,
    ) -> impl Iterator<Item = &Arc<Visit>> + '_ {
        self.time_window(center - half_width, center + half_width)
    }

    /// Open interval `(lo, hi)` over the departure-time index.
    fn time_window(&self, lo: f64, hi: f64) -> impl Iterator<Item = &Arc<Visit>> + '_ {
        let start = self
            .by_time
            .partition_point(|&i| self.visits[i].departure_time <= lo);
        let end = self
            .by_time
            .partition_point(|&i| self.visits[i].departure_time < hi);
        self.by_time[start..end.max(start)]
            .iter()
            .map(|&i| &self.visits[i])
    }

    /// Distinct stops, ordered by id.
    pub fn stops(&self) -> &[StopInfo] {
        &self.stops
    }

    /// All visits in (trip, stop_sequence) order.
    pub fn visits(&self) -> &[Arc<Visit>] {
        &self.visits
    }

    /// Position of a visit in [`visits`](Self::visits).
    pub fn position(&self, visit_id: &VisitId) -> Option<usize> {
        self.by_id.get(visit_id).copied()
    }

    /// Look up a visit by id.
    pub fn get(&self, visit_id: &VisitId) -> Option<&Arc<Visit>> {
        self.position(visit_id).map(|i| &self.visits[i])
    }

    /// Returns the number of visits.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns true if the store holds no visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

fn index_stops(stops: &[StopRecord]) -> Result<HashMap<&str, (StopId, &StopRecord)>, TransitError> {
    let mut index = HashMap::with_capacity(stops.len());
    for stop in stops {
        if !Coord::new(stop.stop_lat, stop.stop_lon).is_valid() {
            return Err(TransitError::Format {
                context: format!("stop {}", stop.stop_id),
                message: format!(
                    "coordinates ({}, {}) are not a valid latitude/longitude",
                    stop.stop_lat, stop.stop_lon
                ),
            });
        }
        if index
            .insert(stop.stop_id.as_str(), (StopId::new(&stop.stop_id), stop))
            .is_some()
        {
            return Err(TransitError::DataIntegrity(format!(
                "duplicate stop_id {}",
                stop.stop_id
            )));
        }
    }
    Ok(index)
}

fn index_trips(
    trips: &[TripRecord],
) -> Result<HashMap<&str, (TripId, RouteId, &TripRecord)>, TransitError> {
    let mut routes: HashMap<&str, RouteId> = HashMap::new();
    let mut index = HashMap::with_capacity(trips.len());
    for trip in trips {
        let route_id = routes
            .entry(trip.route_id.as_str())
            .or_insert_with(|| RouteId::new(&trip.route_id))
            .clone();
        if index
            .insert(
                trip.trip_id.as_str(),
                (TripId::new(&trip.trip_id), route_id, trip),
            )
            .is_some()
        {
            return Err(TransitError::DataIntegrity(format!(
                "duplicate trip_id {}",
                trip.trip_id
            )));
        }
    }
    Ok(index)
}
