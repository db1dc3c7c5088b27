//! Shortest travel times from a location over the transit graph.
//!
//! A query starts at a virtual source joined to every visit at the
//! `nearest_k` stops around the location, each edge weighted by the walk to
//! that stop. Visits that leave before the rider can walk there are not
//! joined.
//! A label-setting Dijkstra then settles nodes in order of elapsed time
//! until the next label would exceed `max_time`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use rayon::prelude::*;
use tracing::debug;

use super::config::QueryConfig;
use crate::domain::{Coord, Location, StopId, TransitError, VisitId};
use crate::graph::{GraphStore, NodeId, TransitGraph};

/// Minimum elapsed time (hours) to every node reached by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TravelTimeResult {
    times: HashMap<VisitId, f64>,
    by_stop: HashMap<StopId, f64>,
}

impl TravelTimeResult {
    /// Travel time to a visit, if it was reached.
    pub fn get(&self, visit_id: &VisitId) -> Option<f64> {
        self.times.get(visit_id).copied()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VisitId, f64)> + '_ {
        self.times.iter().map(|(id, t)| (id, *t))
    }

    /// Earliest time each reached stop is visited.
    pub fn earliest_by_stop(&self) -> &HashMap<StopId, f64> {
        &self.by_stop
    }

    /// Travel time to a stop, if any of its visits was reached.
    pub fn stop_time(&self, stop_id: &StopId) -> Option<f64> {
        self.by_stop.get(stop_id).copied()
    }

    pub fn into_times(self) -> HashMap<VisitId, f64> {
        self.times
    }

    fn settle(&mut self, visit_id: &VisitId, stop_id: &StopId, time: f64) {
        self.times.insert(visit_id.clone(), time);
        self.by_stop
            .entry(stop_id.clone())
            .and_modify(|t| *t = t.min(time))
            .or_insert(time);
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest label first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    time: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs travel-time queries against a built graph.
///
/// Holds no per-query state, so one engine can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TravelTimeEngine<'a> {
    graph: &'a TransitGraph,
}

impl<'a> TravelTimeEngine<'a> {
    pub fn new(graph: &'a TransitGraph) -> Self {
        Self { graph }
    }

    /// The `k` stops nearest to `location`, with their distances.
    pub fn nearest_stops(&self, location: &Location, k: usize) -> Vec<(StopId, f64)> {
        self.graph.stop_index().nearest(location.coord, k)
    }

    /// Minimum travel time from `location` to every node within `max_time`.
    pub fn travel_times(
        &self,
        location: &Location,
        config: &QueryConfig,
    ) -> Result<TravelTimeResult, TransitError> {
        config.validate()?;
        if !location.coord.is_valid() || !location.time.is_finite() {
            return Err(TransitError::InvalidConfig(
                "query location must have valid coordinates and a finite time",
            ));
        }

        let node_count = self.graph.node_count();
        let mut labels = vec![f64::INFINITY; node_count];
        let mut settled = vec![false; node_count];
        let mut frontier = BinaryHeap::new();

        let seeds = self.nearest_stops(location, config.nearest_k);
        for (stop_id, distance) in &seeds {
            let walk = distance / config.walk_speed;
            for &node in self.graph.nodes_at_stop(stop_id) {
                let Some(visit) = self.graph.visit(node) else {
                    continue;
                };
                if visit.departure_time < location.time + walk {
                    continue;
                }
                if walk < labels[node.index()] {
                    labels[node.index()] = walk;
                    frontier.push(Frontier { time: walk, node });
                }
            }
        }

        let mut result = TravelTimeResult::default();
        let graph = self.graph.graph();
        while let Some(Frontier { time, node }) = frontier.pop() {
            if time > config.max_time {
                break;
            }
            if settled[node.index()] {
                continue;
            }
            settled[node.index()] = true;

            if let Some(visit) = self.graph.visit(node) {
                result.settle(&visit.visit_id, &visit.stop_id, time);
            }

            for edge in graph.edges_of(node) {
                let target = edge.target.index();
                let candidate = time + edge.weight;
                if !settled[target] && candidate < labels[target] {
                    labels[target] = candidate;
                    frontier.push(Frontier {
                        time: candidate,
                        node: edge.target,
                    });
                }
            }
        }

        debug!(
            lat = location.coord.lat,
            lon = location.coord.lon,
            time = location.time,
            seeds = seeds.len(),
            reached = result.len(),
            "travel times"
        );

        Ok(result)
    }

    /// Travel time to arbitrary positions, given a finished query.
    ///
    /// Each position takes the best of its `nearest_k` stops: the stop's
    /// earliest time plus the walk from it. `None` when none of those stops
    /// was reached.
    pub fn travel_times_to_positions(
        &self,
        result: &TravelTimeResult,
        positions: &[Coord],
        config: &QueryConfig,
    ) -> Result<Vec<Option<f64>>, TransitError> {
        config.validate()?;

        let index = self.graph.stop_index();
        let times: Vec<Option<f64>> = positions
            .par_iter()
            .map(|&position| {
                index
                    .nearest(position, config.nearest_k)
                    .into_iter()
                    .filter_map(|(stop_id, distance)| {
                        result
                            .stop_time(&stop_id)
                            .map(|t| t + distance / config.walk_speed)
                    })
                    .min_by(f64::total_cmp)
            })
            .collect();

        debug!(
            positions = positions.len(),
            reached = times.iter().flatten().count(),
            "position travel times"
        );

        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, TripId, Visit};
    use crate::graph::GraphBuilder;
    use crate::schedule::{ScheduleConfig, VisitStore};
    use crate::spatial::EARTH_RADIUS_MILES;
    use crate::transfer::TransferConfig;

    const X: Coord = Coord {
        lat: 36.9741,
        lon: -122.0308,
    };
    // About 0.03 miles north of X
    const NEAR_X: Coord = Coord {
        lat: 36.9745,
        lon: -122.0308,
    };
    const A: Coord = Coord {
        lat: 36.9900,
        lon: -122.0308,
    };
    const B: Coord = Coord {
        lat: 36.9600,
        lon: -122.0500,
    };
    const C: Coord = Coord {
        lat: 37.0000,
        lon: -122.0000,
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

    /// Two routes leaving stop X: T1 via A to B, T2 to C.
    fn network() -> TransitGraph {
        let store = VisitStore::new(
            vec![
                visit("T1", "10", "X", 1, 8.0, X),
                visit("T1", "10", "A", 2, 8.5, A),
                visit("T1", "10", "B", 3, 9.5, B),
                visit("T2", "20", "X", 1, 8.2, X),
                visit("T2", "20", "C", 2, 8.9, C),
            ],
            ScheduleConfig::new("", EARTH_RADIUS_MILES),
        )
        .unwrap();
        GraphBuilder::new(&store)
            .build(&TransferConfig::default())
            .unwrap()
    }

    fn id(s: &str) -> VisitId {
        VisitId::new(s)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn query_at_stop_reaches_within_an_hour() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1000.0, 1.0);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &config)
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.get(&id("T1_1")), Some(0.0));
        assert_eq!(result.get(&id("T2_1")), Some(0.0));
        assert_close(result.get(&id("T1_2")), 0.5);
        assert_close(result.get(&id("T2_2")), 0.7);
        // 1.5 hours from the source
        assert_eq!(result.get(&id("T1_3")), None);
    }

    #[test]
    fn departed_visits_are_not_seeded() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1000.0, 1.0);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.1), &config)
            .unwrap();

        let mut reached: Vec<_> = result.iter().map(|(id, _)| id.as_str().to_owned()).collect();
        reached.sort();
        assert_eq!(reached, ["T2_1", "T2_2"]);
    }

    #[test]
    fn walk_to_seed_stop_is_charged() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1.5, 1.0);
        let location = Location::new(NEAR_X.lat, NEAR_X.lon, 7.9);

        let seeds = engine.nearest_stops(&location, 1);
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].0.as_str(), "X");
        let walk = seeds[0].1 / 1.5;
        assert!(walk > 0.0);

        let result = engine.travel_times(&location, &config).unwrap();
        assert_close(result.get(&id("T1_1")), walk);
        assert_close(result.get(&id("T1_2")), walk + 0.5);
    }

    #[test]
    fn visits_leaving_during_the_walk_are_not_seeded() {
        // About 0.5 miles south of X; at 1.5 mph the walk takes 20 minutes
        let start = Coord {
            lat: 36.9669,
            lon: -122.0308,
        };
        let store = VisitStore::new(
            vec![
                visit("T1", "10", "X", 1, 8.01, X),
                visit("T1", "10", "F", 2, 8.2, A),
                visit("T2", "20", "X", 1, 8.4, X),
                visit("T2", "20", "C", 2, 8.6, C),
            ],
            ScheduleConfig::new("", EARTH_RADIUS_MILES),
        )
        .unwrap();
        let graph = GraphBuilder::new(&store)
            .build(&TransferConfig::default())
            .unwrap();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1.5, 1.0);
        let location = Location::new(start.lat, start.lon, 8.0);

        let walk = engine.nearest_stops(&location, 1)[0].1 / 1.5;
        assert!(walk > 0.3 && walk < 0.4);

        let result = engine.travel_times(&location, &config).unwrap();
        assert_eq!(result.get(&id("T1_1")), None);
        assert_eq!(result.get(&id("T1_2")), None);
        assert_close(result.get(&id("T2_1")), walk);
        assert_close(result.get(&id("T2_2")), walk + 0.2);
    }

    #[test]
    fn source_has_zero_travel_time() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1.5, 1.0);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &config)
            .unwrap();
        let earliest = result.iter().map(|(_, t)| t).min_by(f64::total_cmp);
        assert_eq!(earliest, Some(0.0));
        assert_eq!(result.get(&id("T1_1")), Some(0.0));
    }

    #[test]
    fn travel_times_are_bounded_and_non_negative() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(5, 1.5, 2.0);

        let result = engine
            .travel_times(&Location::new(NEAR_X.lat, NEAR_X.lon, 7.5), &config)
            .unwrap();
        assert!(!result.is_empty());
        for (_, t) in result.iter() {
            assert!((0.0..=config.max_time).contains(&t));
        }
    }

    #[test]
    fn zero_budget_keeps_only_free_seeds() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1.5, 0.0);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &config)
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.stop_time(&StopId::new("X")), Some(0.0));
    }

    #[test]
    fn earliest_by_stop_takes_the_minimum() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1000.0, 1.0);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &config)
            .unwrap();
        let by_stop = result.earliest_by_stop();

        assert_eq!(by_stop.len(), 3);
        assert_eq!(by_stop[&StopId::new("X")], 0.0);
        assert_close(result.stop_time(&StopId::new("A")), 0.5);
        assert_close(result.stop_time(&StopId::new("C")), 0.7);
        assert_eq!(result.stop_time(&StopId::new("B")), None);
    }

    #[test]
    fn nearest_k_beyond_stop_count_uses_every_stop() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);

        let seeds = engine.nearest_stops(&Location::new(X.lat, X.lon, 8.0), 50);
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0].0.as_str(), "X");
    }

    #[test]
    fn empty_graph_gives_empty_result() {
        let store = VisitStore::new(Vec::new(), ScheduleConfig::new("", EARTH_RADIUS_MILES)).unwrap();
        let graph = GraphBuilder::new(&store)
            .build(&TransferConfig::default())
            .unwrap();
        let engine = TravelTimeEngine::new(&graph);

        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &QueryConfig::default())
            .unwrap();
        assert!(result.is_empty());
        assert!(result.earliest_by_stop().is_empty());
    }

    #[test]
    fn rejects_invalid_queries() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);

        let bad_config = QueryConfig::new(5, -1.0, 1.0);
        assert!(matches!(
            engine.travel_times(&Location::new(X.lat, X.lon, 8.0), &bad_config),
            Err(TransitError::InvalidConfig(_))
        ));

        let bad_location = Location::new(123.0, X.lon, 8.0);
        assert!(matches!(
            engine.travel_times(&bad_location, &QueryConfig::default()),
            Err(TransitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn positions_use_nearest_reached_stop() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let config = QueryConfig::new(1, 1000.0, 1.0);
        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &config)
            .unwrap();

        let times = engine
            .travel_times_to_positions(&result, &[A, C, B], &config)
            .unwrap();

        assert_eq!(times.len(), 3);
        assert_close(times[0], 0.5);
        assert_close(times[1], 0.7);
        // B's only visit is over the time budget
        assert_eq!(times[2], None);
    }

    #[test]
    fn positions_add_the_final_walk() {
        let graph = network();
        let engine = TravelTimeEngine::new(&graph);
        let query = QueryConfig::new(1, 1000.0, 1.0);
        let result = engine
            .travel_times(&Location::new(X.lat, X.lon, 8.0), &query)
            .unwrap();

        let walk = QueryConfig::new(1, 1.5, 1.0);
        let location = Location::new(NEAR_X.lat, NEAR_X.lon, 8.0);
        let distance = engine.nearest_stops(&location, 1)[0].1;

        let times = engine
            .travel_times_to_positions(&result, &[NEAR_X], &walk)
            .unwrap();
        assert_close(times[0], distance / 1.5);
    }
}
