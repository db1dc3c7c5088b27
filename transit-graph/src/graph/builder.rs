//! Time-expanded graph construction.
//!
//! Every visit becomes a node. Consecutive visits of a trip are joined by a
//! ride edge weighted by the scheduled time between them, and every visit
//! gets a transfer edge to each match the spatial-temporal matcher finds,
//! weighted by the wait.
//!
//! Trips only read the shared store, so their edges are computed on rayon
//! workers. A single writer then appends them in trip-id order, which keeps
//! the result identical from run to run.

use rayon::prelude::*;
use tracing::{debug, info};

use super::store::{AdjacencyGraph, Edge, EdgeKind, GraphStore, NodeId};
use super::transit::TransitGraph;
use crate::domain::{TransitError, TripId, Visit};
use crate::schedule::VisitStore;
use crate::spatial::{Distance, Haversine};
use crate::transfer::{SpatialTemporalMatcher, TransferConfig};

/// Builds a [`TransitGraph`] from a visit store.
pub struct GraphBuilder<'a, D = Haversine> {
    store: &'a VisitStore,
    matcher: SpatialTemporalMatcher<'a, D>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder using the store's sphere radius for transfers.
    pub fn new(store: &'a VisitStore) -> Self {
        Self {
            store,
            matcher: SpatialTemporalMatcher::new(store),
        }
    }
}

impl<'a, D: Distance> GraphBuilder<'a, D> {
    /// Create a builder around an existing matcher.
    pub fn with_matcher(store: &'a VisitStore, matcher: SpatialTemporalMatcher<'a, D>) -> Self {
        Self { store, matcher }
    }

    /// Build the graph.
    ///
    /// Any error aborts the whole build: a graph with a malformed trip would
    /// give wrong shortest paths.
    pub fn build(&self, transfer: &TransferConfig) -> Result<TransitGraph, TransitError> {
        transfer.validate()?;

        let trips: Vec<TripId> = self
            .store
            .trips(self.store.day_filter())
            .into_iter()
            .collect();
        info!(
            trips = trips.len(),
            visits = self.store.len(),
            "building transit graph"
        );

        let per_trip: Vec<Vec<(NodeId, Edge)>> = trips
            .par_iter()
            .map(|trip| self.trip_edges(trip, transfer))
            .collect::<Result<_, _>>()?;

        let mut graph = AdjacencyGraph::with_capacity(self.store.len());
        for _ in self.store.visits() {
            graph.add_node();
        }

        let mut rides = 0;
        let mut transfers = 0;
        for (from, edge) in per_trip.into_iter().flatten() {
            match edge.kind {
                EdgeKind::Ride => rides += 1,
                EdgeKind::Transfer => transfers += 1,
            }
            graph.add_edge(from, edge);
        }

        info!(
            nodes = graph.node_count(),
            rides, transfers, "built transit graph"
        );

        Ok(TransitGraph::new(graph, self.store))
    }

    /// Edges leaving the visits of one trip.
    fn trip_edges(
        &self,
        trip: &TripId,
        transfer: &TransferConfig,
    ) -> Result<Vec<(NodeId, Edge)>, TransitError> {
        let visits = self.store.visits_for_trip(trip)?;
        for visit in visits {
            visit.validate()?;
        }

        let mut edges = Vec::with_capacity(visits.len());
        for (idx, visit) in visits.iter().enumerate() {
            let from = self.node_of(visit)?;

            if let Some(next) = visits.get(idx + 1) {
                let weight = next.departure_time - visit.departure_time;
                if !(weight >= 0.0) {
                    return Err(TransitError::DataIntegrity(format!(
                        "negative ride time {weight} h from {} to {}",
                        visit.visit_id, next.visit_id
                    )));
                }
                edges.push((from, Edge::ride(self.node_of(next)?, weight)));
            }

            for candidate in self.matcher.transfer_candidates(visit, transfer)? {
                edges.push((
                    from,
                    Edge::transfer(self.node_of(candidate.visit)?, candidate.wait),
                ));
            }
        }

        debug!(trip = %trip, edges = edges.len(), "trip edges");
        Ok(edges)
    }

    fn node_of(&self, visit: &Visit) -> Result<NodeId, TransitError> {
        self.store
            .position(&visit.visit_id)
            .map(|idx| NodeId(idx as u32))
            .ok_or_else(|| {
                TransitError::DataIntegrity(format!("visit {} is not in the store", visit.visit_id))
            })
    }
}
