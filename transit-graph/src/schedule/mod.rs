//! Timetable storage.
//!
//! Raw stop-time, stop and trip records are joined once into typed
//! [`Visit`](crate::domain::Visit)s and indexed for the lookups the graph
//! builder and transfer matcher need.

mod config;
mod records;
mod store;

pub use config::{ScheduleConfig, matches_day};
pub use records::{RawSchedule, StopRecord, StopTimeRecord, TripRecord};
pub use store::{StopInfo, VisitStore};
