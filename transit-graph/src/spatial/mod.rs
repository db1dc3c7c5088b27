//! Geodesic distance and spatial indexing.

mod distance;
mod stop_index;

pub use distance::{Distance, EARTH_RADIUS_MILES, Haversine, haversine_distance};
pub use stop_index::{StopIndex, StopPoint};
