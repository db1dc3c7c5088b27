//! Raw timetable records, before they are joined into visits.

use serde::Deserialize;

/// One row of `stop_times.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    /// `H:MM:SS`, parsed into decimal hours during the join.
    pub departure_time: String,
}

/// One row of `stops.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// One row of `trips.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    #[serde(default)]
    pub trip_headsign: String,
}

/// The three tables a visit store is joined from.
#[derive(Debug, Clone, Default)]
pub struct RawSchedule {
    pub stop_times: Vec<StopTimeRecord>,
    pub stops: Vec<StopRecord>,
    pub trips: Vec<TripRecord>,
}
