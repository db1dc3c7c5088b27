//! Walking transfers between visits on different routes.

mod config;
mod matcher;

pub use config::TransferConfig;
pub use matcher::{COARSE_TIME_BUFFER, SpatialTemporalMatcher, TransferCandidate};
