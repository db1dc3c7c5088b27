//! Transit travel-time server.
//!
//! Loads a GTFS timetable into a time-expanded graph of stop visits and
//! answers: "starting here at this time, how soon can I reach each stop?"

pub mod domain;
pub mod engine;
pub mod graph;
pub mod gtfs;
pub mod schedule;
pub mod spatial;
pub mod transfer;
pub mod web;
