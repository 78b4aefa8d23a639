use crate::analyzers::types::TimeReport;
use crate::analyzers::utility::popular;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::weekday_name;

/// Most common month, weekday and start hour.
pub fn time_stats(dataset: &Dataset) -> Result<TimeReport> {
    let records = dataset.records();

    Ok(TimeReport {
        popular_month: popular(records.iter().map(|r| r.month), "time")?,
        popular_day: weekday_name(popular(records.iter().map(|r| r.weekday), "time")?)
            .to_string(),
        popular_hour: popular(records.iter().map(|r| r.hour), "time")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use crate::error::BikeshareError;
    use crate::filter::City;
    use chrono::NaiveDateTime;

    fn dataset(starts: &[&str]) -> Dataset {
        let records = starts
            .iter()
            .map(|s| {
                let ts = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
                TripRecord::new(ts, ts, 60, "A", "B")
            })
            .collect();
        Dataset::new(City::Chicago, Schema::default(), records)
    }

    #[test]
    fn test_time_stats_modes() {
        let ds = dataset(&[
            "2017-01-01 08:00:00",
            "2017-01-01 08:05:00",
            "2017-03-06 17:00:00",
        ]);
        let report = time_stats(&ds).unwrap();
        assert_eq!(report.popular_month, 1);
        assert_eq!(report.popular_day, "Sunday");
        assert_eq!(report.popular_hour, 8);
    }

    #[test]
    fn test_time_stats_tie_goes_to_first_row() {
        let ds = dataset(&[
            "2017-05-02 23:00:00",
            "2017-02-01 00:00:00",
            "2017-02-01 00:30:00",
            "2017-05-02 23:30:00",
        ]);
        let report = time_stats(&ds).unwrap();
        assert_eq!(report.popular_month, 5);
        assert_eq!(report.popular_day, "Tuesday");
        assert_eq!(report.popular_hour, 23);
    }

    #[test]
    fn test_time_stats_empty_dataset() {
        let err = time_stats(&dataset(&[])).unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyDataset("time")));
    }
}
