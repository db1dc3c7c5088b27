//! Node/edge storage for the time-expanded graph.

/// Dense index of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Staying aboard between consecutive stops of one trip.
    Ride,
    /// Alighting and walking to board another route.
    Transfer,
}

/// A directed, weighted edge. The weight is in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: f64,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn ride(target: NodeId, weight: f64) -> Self {
        Self {
            target,
            weight,
            kind: EdgeKind::Ride,
        }
    }

    pub fn transfer(target: NodeId, weight: f64) -> Self {
        Self {
            target,
            weight,
            kind: EdgeKind::Transfer,
        }
    }
}

/// Minimal graph interface used by the builder and the search.
///
/// Any representation (adjacency list, CSR, ...) can back a transit graph as
/// long as node ids are dense from zero.
pub trait GraphStore {
    /// Add a node and return its id.
    fn add_node(&mut self) -> NodeId;

    /// Add a directed edge from `from`.
    fn add_edge(&mut self, from: NodeId, edge: Edge);

    /// Outgoing edges of `node`.
    fn edges_of(&self, node: NodeId) -> &[Edge];

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Targets of the outgoing edges of `node`.
    fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges_of(node).iter().map(|e| e.target)
    }
}

/// Adjacency-list graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    adjacency: Vec<Vec<Edge>>,
    edges: usize,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            adjacency: Vec::with_capacity(nodes),
            edges: 0,
        }
    }
}

impl GraphStore for AdjacencyGraph {
    fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.adjacency.len() as u32);
        self.adjacency.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: NodeId, edge: Edge) {
        debug_assert_ne!(from, edge.target, "self-loop edge");
        self.adjacency[from.index()].push(edge);
        self.edges += 1;
    }

    fn edges_of(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(node.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}
