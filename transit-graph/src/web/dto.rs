//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{QueryConfig, TravelTimeResult};

/// Request for travel times from a location.
#[derive(Debug, Deserialize)]
pub struct TravelTimesRequest {
    /// Latitude of the starting point (degrees)
    pub lat: f64,

    /// Longitude of the starting point (degrees)
    pub lon: f64,

    /// When travel begins, as H:MM:SS on the service day
    pub departure_time: String,

    /// Overrides the server's default seed stop count
    pub nearest_k: Option<usize>,

    /// Overrides the server's default walking speed
    pub walk_speed: Option<f64>,

    /// Overrides the server's default time budget (hours)
    pub max_time: Option<f64>,

    /// Key the response by stop id instead of visit id
    #[serde(default)]
    pub by_stop: bool,
}

impl TravelTimesRequest {
    /// The query configuration, with unset fields taken from `defaults`.
    pub fn query_config(&self, defaults: &QueryConfig) -> QueryConfig {
        QueryConfig::new(
            self.nearest_k.unwrap_or(defaults.nearest_k),
            self.walk_speed.unwrap_or(defaults.walk_speed),
            self.max_time.unwrap_or(defaults.max_time),
        )
    }
}

/// Travel times in hours, keyed by visit id or stop id.
#[derive(Debug, Serialize)]
pub struct TravelTimesResponse {
    pub travel_times: BTreeMap<String, f64>,
}

impl TravelTimesResponse {
    pub fn by_visit(result: &TravelTimeResult) -> Self {
        Self {
            travel_times: result
                .iter()
                .map(|(id, t)| (id.to_string(), t))
                .collect(),
        }
    }

    pub fn by_stop(result: &TravelTimeResult) -> Self {
        Self {
            travel_times: result
                .earliest_by_stop()
                .iter()
                .map(|(id, t)| (id.to_string(), *t))
                .collect(),
        }
    }
}

/// A point to evaluate travel time to.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Request for travel times to arbitrary positions.
#[derive(Debug, Deserialize)]
pub struct PositionTimesRequest {
    /// Where and when the query starts
    #[serde(flatten)]
    pub query: TravelTimesRequest,

    /// Points to evaluate
    pub positions: Vec<PositionRequest>,
}

/// One entry per requested position; `null` where nothing was reached.
#[derive(Debug, Serialize)]
pub struct PositionTimesResponse {
    pub travel_times: Vec<Option<f64>>,
}

/// Size of the loaded graph.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub nodes: usize,
    pub edges: usize,
    pub stops: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
