//! Trip statistics.
//!
//! Four independent, read-only reports over a [`Dataset`]: travel times,
//! station popularity, trip duration and rider demographics. Each is
//! computed fresh on every call.

pub mod duration;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;

pub use duration::duration_stats;
pub use station::station_stats;
pub use time::time_stats;
pub use user::user_stats;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::Result;
use types::{DurationReport, StationReport, TimeReport, UserReport};

/// All four reports for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reports {
    pub rows: usize,
    pub time: TimeReport,
    pub stations: StationReport,
    pub duration: DurationReport,
    pub users: UserReport,
}

/// Runs every report, failing on the first error.
pub fn analyze_all(dataset: &Dataset) -> Result<Reports> {
    Ok(Reports {
        rows: dataset.len(),
        time: time_stats(dataset)?,
        stations: station_stats(dataset)?,
        duration: duration_stats(dataset)?,
        users: user_stats(dataset)?,
    })
}
