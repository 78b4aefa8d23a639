//! CSV parser for bikeshare trip exports.
//!
//! Columns are located by header name, so the unnamed index column present
//! in some exports is simply ignored. `Gender` and `Birth Year` are optional:
//! when the header lacks them the dataset schema records them as absent.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;
use tracing::debug;

use crate::dataset::{Capability, Dataset, Schema, TripRecord};
use crate::error::{BikeshareError, Result};
use crate::filter::City;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Column positions resolved from the header row.
struct Columns {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| BikeshareError::SourceParse {
                path: path.to_path_buf(),
                line: Some(1),
                message: format!("missing column '{name}'"),
            })
        };

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            gender: Capability::from_header(self.gender.is_some()),
            birth_year: Capability::from_header(self.birth_year.is_some()),
        }
    }
}

/// Parses a full trip export into a [`Dataset`].
///
/// `path` is only used to label errors.
///
/// # Errors
///
/// Fails on a missing required column, a malformed row, or an I/O error
/// from `reader`. Blank optional cells are not errors.
#[tracing::instrument(skip(reader, path), fields(path = %path.display()))]
pub fn parse_trips<R: Read>(reader: R, city: City, path: &Path) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let csv_err = |source| BikeshareError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let columns = Columns::resolve(&headers, path)?;
    let schema = columns.schema();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_err)?;
        let line = row.position().map(|p| p.line());
        let record = parse_row(&row, &columns).map_err(|message| BikeshareError::SourceParse {
            path: path.to_path_buf(),
            line,
            message,
        })?;
        records.push(record);
    }

    debug!(
        rows = records.len(),
        gender = ?schema.gender,
        birth_year = ?schema.birth_year,
        "Parsed trip export"
    );

    Ok(Dataset::new(city, schema, records))
}

fn parse_row(row: &StringRecord, columns: &Columns) -> std::result::Result<TripRecord, String> {
    let cell = |idx: usize| row.get(idx).map(str::trim).unwrap_or("");
    let optional = |idx: Option<usize>| {
        idx.map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let start_time = parse_timestamp(cell(columns.start_time))?;
    let end_time = parse_timestamp(cell(columns.end_time))?;
    let trip_duration = parse_duration(cell(columns.trip_duration))?;
    let birth_year = match optional(columns.birth_year) {
        Some(raw) => Some(parse_birth_year(&raw)?),
        None => None,
    };

    Ok(TripRecord::new(
        start_time,
        end_time,
        trip_duration,
        cell(columns.start_station),
        cell(columns.end_station),
    )
    .with_user_type(optional(Some(columns.user_type)))
    .with_demographics(optional(columns.gender), birth_year))
}

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp (a `T` separator and fractional
/// seconds are tolerated).
pub fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("invalid timestamp '{raw}'"))
}

/// Trip duration in whole seconds. Fractional exports are rounded.
pub fn parse_duration(raw: &str) -> std::result::Result<u64, String> {
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(secs);
    }
    match raw.parse::<f64>() {
        // u64::MAX as f64 rounds up to 2^64, which does not fit
        Ok(secs) if secs >= 0.0 && (0.0..u64::MAX as f64).contains(&secs.round()) => {
            Ok(secs.round() as u64)
        }
        _ => Err(format!("invalid trip duration '{raw}'")),
    }
}

/// Birth years are exported as floats (`1992.0`) by some systems.
pub fn parse_birth_year(raw: &str) -> std::result::Result<i32, String> {
    let invalid = || format!("invalid birth year '{raw}'");
    if let Ok(year) = raw.parse::<i64>() {
        return i32::try_from(year).map_err(|_| invalid());
    }
    match raw.parse::<f64>() {
        Ok(year)
            if year.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&year) =>
        {
            Ok(year as i32)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    fn parse(text: &str, city: City) -> Result<Dataset> {
        parse_trips(text.as_bytes(), city, Path::new("test.csv"))
    }

    #[test]
    fn test_parse_full_schema() {
        let ds = parse(CHICAGO, City::Chicago).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.schema().gender, Capability::Present);
        assert_eq!(ds.schema().birth_year, Capability::Present);

        let first = &ds.records()[0];
        assert_eq!(first.trip_duration, 321);
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.user_type.as_deref(), Some("Subscriber"));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.weekday, Weekday::Fri);
        assert_eq!(first.hour, 15);
    }

    #[test]
    fn test_blank_optional_cells_become_none() {
        let ds = parse(CHICAGO, City::Chicago).unwrap();
        let second = &ds.records()[1];
        assert_eq!(second.gender, None);
        assert_eq!(second.birth_year, None);
    }

    #[test]
    fn test_missing_optional_columns_mark_schema_absent() {
        let ds = parse(WASHINGTON, City::Washington).unwrap();
        assert_eq!(ds.schema().gender, Capability::Absent);
        assert_eq!(ds.schema().birth_year, Capability::Absent);
        assert_eq!(ds.records()[0].trip_duration, 489);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let text = "Start Time,End Time,Trip Duration,Start Station,End Station\n";
        let err = parse(text, City::Chicago).unwrap_err();
        assert!(matches!(err, BikeshareError::SourceParse { .. }));
        assert!(err.to_string().contains("missing column 'User Type'"));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let text = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 08:00:00,2017-01-01 08:05:00,300,A,B,Subscriber
yesterday,2017-01-01 08:05:00,300,A,B,Subscriber
";
        match parse(text, City::Chicago).unwrap_err() {
            BikeshareError::SourceParse { line, message, .. } => {
                assert_eq!(line, Some(3));
                assert!(message.contains("yesterday"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let text = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 08:00:00,2017-01-01 08:05:00,300,A
";
        let err = parse(text, City::Chicago).unwrap_err();
        assert!(matches!(err, BikeshareError::Csv { .. }));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2017-01-01 08:00:00").is_ok());
        assert!(parse_timestamp("2017-01-01T08:00:00").is_ok());
        assert!(parse_timestamp("2017-01-01 08:00:00.250").is_ok());
        assert!(parse_timestamp("01/01/2017 08:00").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_negative() {
        assert_eq!(parse_duration("300"), Ok(300));
        assert_eq!(parse_duration("299.6"), Ok(300));
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_out_of_range() {
        assert_eq!(parse_duration("1e3"), Ok(1000));
        assert_eq!(
            parse_duration("1e30"),
            Err("invalid trip duration '1e30'".to_string())
        );
        assert!(parse_duration("99999999999999999999").is_err());
        assert!(parse_duration("inf").is_err());
    }

    #[test]
    fn test_parse_birth_year_float() {
        assert_eq!(parse_birth_year("1985"), Ok(1985));
        assert_eq!(parse_birth_year("1985.0"), Ok(1985));
        assert!(parse_birth_year("1985.5").is_err());
    }

    #[test]
    fn test_parse_birth_year_rejects_out_of_range() {
        for raw in ["99999999999", "1e10", "1e30", "-1e30", "NaN"] {
            assert_eq!(
                parse_birth_year(raw),
                Err(format!("invalid birth year '{raw}'")),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_out_of_range_birth_year_fails_the_row() {
        let text = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-01 08:00:00,2017-01-01 08:05:00,300,A,B,Subscriber,Male,1e10
";
        match parse(text, City::Chicago).unwrap_err() {
            BikeshareError::SourceParse { line, message, .. } => {
                assert_eq!(line, Some(2));
                assert!(message.contains("invalid birth year"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
