//! Nearest-stop lookup.
//!
//! Stops are indexed in an R-tree by their position on the unit sphere
//! rather than by raw latitude/longitude. Straight-line (chord) distance
//! between unit vectors is a monotone function of great-circle distance, so
//! the R-tree's Euclidean nearest-neighbour order is exactly the geodesic
//! order, with no longitude-scaling error near the poles or the antimeridian.
//! Reported distances are recomputed with the haversine metric.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::{Distance, Haversine};
use crate::domain::{Coord, StopId};

/// A stop stored in the R-tree.
#[derive(Debug, Clone)]
pub struct StopPoint {
    pub stop_id: StopId,
    pub coord: Coord,
    xyz: [f64; 3],
}

impl StopPoint {
    pub fn new(stop_id: StopId, coord: Coord) -> Self {
        Self {
            stop_id,
            coord,
            xyz: unit_vector(coord),
        }
    }
}

impl RTreeObject for StopPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for StopPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

fn unit_vector(coord: Coord) -> [f64; 3] {
    let lat = coord.lat.to_radians();
    let lon = coord.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Spatial index over distinct stop coordinates.
#[derive(Debug)]
pub struct StopIndex {
    tree: RTree<StopPoint>,
    metric: Haversine,
}

impl StopIndex {
    /// Bulk-load an index. Stops with invalid coordinates are skipped.
    pub fn new(stops: impl IntoIterator<Item = (StopId, Coord)>, metric: Haversine) -> Self {
        let points = stops
            .into_iter()
            .filter(|(_, coord)| coord.is_valid())
            .map(|(stop_id, coord)| StopPoint::new(stop_id, coord))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
            metric,
        }
    }

    /// The `k` stops closest to `coord`, nearest first, with their distances.
    ///
    /// Returns fewer than `k` entries if the index holds fewer stops.
    pub fn nearest(&self, coord: Coord, k: usize) -> Vec<(StopId, f64)> {
        if !coord.is_valid() {
            return Vec::new();
        }
        self.tree
            .nearest_neighbor_iter(&unit_vector(coord))
            .take(k)
            .map(|p| (p.stop_id.clone(), self.metric.distance(coord, p.coord)))
            .collect()
    }

    /// Returns the number of indexed stops.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if no stops are indexed.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
