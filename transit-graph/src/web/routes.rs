//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{Coord, DecimalHours, Location, TransitError};
use crate::engine::{QueryConfig, TravelTimeEngine};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/travel-times", post(travel_times))
        .route("/travel-times/positions", post(position_times))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Node, edge and stop counts of the loaded graph.
async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        nodes: state.graph.node_count(),
        edges: state.graph.edge_count(),
        stops: state.graph.stop_count(),
    })
}

/// Travel times from a location to every reachable visit or stop.
async fn travel_times(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TravelTimesResponse>, AppError> {
    let req: TravelTimesRequest = parse_json(&body)?;
    let (location, config) = query_params(&req, &state.defaults)?;
    let by_stop = req.by_stop;

    let graph = Arc::clone(&state.graph);
    let response = tokio::task::spawn_blocking(move || {
        let result = TravelTimeEngine::new(&graph).travel_times(&location, &config)?;
        Ok::<_, TransitError>(if by_stop {
            TravelTimesResponse::by_stop(&result)
        } else {
            TravelTimesResponse::by_visit(&result)
        })
    })
    .await
    .map_err(AppError::from_join)??;

    Ok(Json(response))
}

/// Travel times from a location to a list of arbitrary positions.
async fn position_times(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PositionTimesResponse>, AppError> {
    let req: PositionTimesRequest = parse_json(&body)?;
    let (location, config) = query_params(&req.query, &state.defaults)?;
    let positions: Vec<Coord> = req
        .positions
        .iter()
        .map(|p| Coord::new(p.lat, p.lon))
        .collect();

    let graph = Arc::clone(&state.graph);
    let travel_times = tokio::task::spawn_blocking(move || {
        let engine = TravelTimeEngine::new(&graph);
        let result = engine.travel_times(&location, &config)?;
        engine.travel_times_to_positions(&result, &positions, &config)
    })
    .await
    .map_err(AppError::from_join)??;

    Ok(Json(PositionTimesResponse { travel_times }))
}

/// Parse a JSON body, logging it if it is malformed.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn query_params(
    req: &TravelTimesRequest,
    defaults: &QueryConfig,
) -> Result<(Location, QueryConfig), AppError> {
    let departure =
        DecimalHours::parse_hms(&req.departure_time).map_err(|e| AppError::BadRequest {
            message: format!("Invalid departure_time {}: {e}", req.departure_time),
        })?;
    let location = Location::new(req.lat, req.lon, departure.hours());
    Ok((location, req.query_config(defaults)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn from_join(e: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("query task failed: {e}"),
        }
    }
}

impl From<TransitError> for AppError {
    fn from(e: TransitError) -> Self {
        match e {
            TransitError::InvalidConfig(_) | TransitError::Format { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
