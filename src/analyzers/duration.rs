use crate::analyzers::types::DurationReport;
use crate::analyzers::utility::mean;
use crate::dataset::Dataset;
use crate::error::{BikeshareError, Result};

/// Total and mean trip duration, in seconds.
pub fn duration_stats(dataset: &Dataset) -> Result<DurationReport> {
    let records = dataset.records();
    let total: u128 = records.iter().map(|r| u128::from(r.trip_duration)).sum();
    let mean = mean(total, records.len()).ok_or(BikeshareError::EmptyDataset("duration"))?;

    Ok(DurationReport {
        trips: records.len(),
        total,
        mean,
    })
}
