//! The time-expanded transit graph.
//!
//! Nodes are visits; ride edges follow trips, transfer edges join visits on
//! different routes that a rider can walk between in time.

mod builder;
mod store;
mod transit;

pub use builder::GraphBuilder;
pub use store::{AdjacencyGraph, Edge, EdgeKind, GraphStore, NodeId};
pub use transit::TransitGraph;
