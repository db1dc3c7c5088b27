//! Domain error types.
//!
//! Construction-time errors (`Format`, `DataIntegrity`, `InvalidVisit`) abort
//! a graph build. `NotFound` is recoverable and left to the caller. Filters
//! that find nothing are never errors.

use std::path::PathBuf;

/// Errors raised while loading a schedule, building the graph or querying it.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// A time string or numeric field could not be parsed.
    #[error("malformed {context}: {message}")]
    Format { context: String, message: String },

    /// Duplicate visit id, dangling stop/trip reference or negative ride time.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// A visit handed to the matcher is missing usable data.
    #[error("invalid visit {visit_id}: {reason}")]
    InvalidVisit {
        visit_id: String,
        reason: &'static str,
    },

    /// Lookup of an unknown trip.
    #[error("not found: {0}")]
    NotFound(String),

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A schedule file could not be opened.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
