//! Web layer for the travel-time service.
//!
//! Provides HTTP endpoints for querying travel times over a loaded graph.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
