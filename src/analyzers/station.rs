use crate::analyzers::types::{StationPair, StationReport};
use crate::analyzers::utility::popular;
use crate::dataset::Dataset;
use crate::error::Result;

/// Most common start station, end station and start/end combination.
///
/// The combination is the mode of the pair itself, not the pairing of the
/// two independent modes. Blank station cells are skipped, and a trip with
/// either end blank does not count toward the combination.
pub fn station_stats(dataset: &Dataset) -> Result<StationReport> {
    let records = dataset.records();

    let popular_start = popular(
        records.iter().map(|r| &r.start_station).filter(|s| !s.is_empty()),
        "station",
    )?;
    let popular_end = popular(
        records.iter().map(|r| &r.end_station).filter(|s| !s.is_empty()),
        "station",
    )?;
    let (start, end) = popular(
        records
            .iter()
            .filter(|r| !r.start_station.is_empty() && !r.end_station.is_empty())
            .map(|r| (&r.start_station, &r.end_station)),
        "station",
    )?;

    Ok(StationReport {
        popular_start: popular_start.to_string(),
        popular_end: popular_end.to_string(),
        popular_trip: StationPair {
            start: start.to_string(),
            end: end.to_string(),
        },
    })
}
