//! Travel-time queries over a built graph.

mod config;
mod travel_time;

pub use config::QueryConfig;
pub use travel_time::{TravelTimeEngine, TravelTimeResult};
