//! The built, immutable transit graph.

use std::collections::HashMap;
use std::sync::Arc;

use super::store::{AdjacencyGraph, GraphStore, NodeId};
use crate::domain::{StopId, Visit, VisitId};
use crate::schedule::VisitStore;
use crate::spatial::StopIndex;

/// A time-expanded graph together with its node payloads and stop index.
///
/// Node `i` is the `i`-th visit of the store the graph was built from. Once
/// built, the graph is only read, so one instance can be shared behind an
/// `Arc` by any number of concurrent queries.
#[derive(Debug)]
pub struct TransitGraph {
    graph: AdjacencyGraph,
    visits: Vec<Arc<Visit>>,
    node_by_visit: HashMap<VisitId, NodeId>,
    nodes_by_stop: HashMap<StopId, Vec<NodeId>>,
    stop_index: StopIndex,
}

impl TransitGraph {
    pub(crate) fn new(graph: AdjacencyGraph, store: &VisitStore) -> Self {
        let visits = store.visits().to_vec();

        let mut node_by_visit = HashMap::with_capacity(visits.len());
        let mut nodes_by_stop: HashMap<StopId, Vec<NodeId>> = HashMap::new();
        for (idx, visit) in visits.iter().enumerate() {
            let node = NodeId(idx as u32);
            node_by_visit.insert(visit.visit_id.clone(), node);
            nodes_by_stop
                .entry(visit.stop_id.clone())
                .or_default()
                .push(node);
        }

        let stop_index = StopIndex::new(
            store.stops().iter().map(|s| (s.stop_id.clone(), s.coord)),
            store.config().metric(),
        );

        Self {
            graph,
            visits,
            node_by_visit,
            nodes_by_stop,
            stop_index,
        }
    }

    /// Returns the underlying node/edge store.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// The visit a node stands for.
    pub fn visit(&self, node: NodeId) -> Option<&Arc<Visit>> {
        self.visits.get(node.index())
    }

    /// The node of a visit.
    pub fn node_of(&self, visit_id: &VisitId) -> Option<NodeId> {
        self.node_by_visit.get(visit_id).copied()
    }

    /// Nodes of every visit at a stop.
    pub fn nodes_at_stop(&self, stop_id: &StopId) -> &[NodeId] {
        self.nodes_by_stop
            .get(stop_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the stop coordinate index.
    pub fn stop_index(&self) -> &StopIndex {
        &self.stop_index
    }

    /// All nodes with their visits.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Arc<Visit>)> + '_ {
        self.visits
            .iter()
            .enumerate()
            .map(|(idx, visit)| (NodeId(idx as u32), visit))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the number of distinct stops.
    pub fn stop_count(&self) -> usize {
        self.stop_index.len()
    }
}
