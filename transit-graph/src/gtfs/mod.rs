//! Reading GTFS feeds from disk.
//!
//! Only the three tables needed to build visits are read: `stop_times.txt`,
//! `stops.txt` and `trips.txt`. Columns the records don't name are ignored.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::TransitError;
use crate::schedule::RawSchedule;

pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const STOPS_FILE: &str = "stops.txt";
pub const TRIPS_FILE: &str = "trips.txt";

/// Read the stop-time, stop and trip tables of the feed in `dir`.
pub fn read_dir(dir: &Path) -> Result<RawSchedule, TransitError> {
    let schedule = RawSchedule {
        stop_times: read_table(dir, STOP_TIMES_FILE)?,
        stops: read_table(dir, STOPS_FILE)?,
        trips: read_table(dir, TRIPS_FILE)?,
    };

    info!(
        dir = %dir.display(),
        stop_times = schedule.stop_times.len(),
        stops = schedule.stops.len(),
        trips = schedule.trips.len(),
        "read gtfs feed"
    );

    Ok(schedule)
}

/// Deserialize every row of one table.
fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, TransitError> {
    let path = dir.join(file);
    let handle = File::open(&path).map_err(|source| TransitError::Io {
        path: path.clone(),
        source,
    })?;

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(handle);

    reader
        .into_deserialize::<T>()
        .map(|row| row.map_err(|e| csv_error(&path, file, e)))
        .collect()
}

fn csv_error(path: &Path, file: &str, err: csv::Error) -> TransitError {
    let context = match err.position() {
        Some(pos) => format!("{file} line {}", pos.line()),
        None => file.to_string(),
    };
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => TransitError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => TransitError::Format { context, message },
    }
}
