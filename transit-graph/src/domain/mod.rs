//! Domain types for the transit graph.
//!
//! This module contains the validated timetable model: identifiers,
//! service-day times, coordinates and visits, plus the error taxonomy shared
//! by every layer above it.

mod error;
mod ids;
mod location;
mod time;
mod visit;

pub use error::TransitError;
pub use ids::{RouteId, StopId, TripId, VisitId};
pub use location::{Coord, Location};
pub use time::{DecimalHours, TimeError};
pub use visit::Visit;
