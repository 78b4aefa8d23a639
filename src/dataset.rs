//! In-memory trip table.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::filter::{City, FilterSpec};

/// Whether an optional column exists in the source schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Present,
    Absent,
}

impl Capability {
    pub fn from_header(found: bool) -> Self {
        if found {
            Capability::Present
        } else {
            Capability::Absent
        }
    }

    pub fn is_present(self) -> bool {
        self == Capability::Present
    }
}

/// Optional demographic columns available for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub gender: Capability,
    pub birth_year: Capability,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            gender: Capability::Absent,
            birth_year: Capability::Absent,
        }
    }
}

/// A single trip. `month`, `weekday` and `hour` are derived from `start_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub trip_duration: u64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    pub month: u32,
    pub weekday: Weekday,
    pub hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        trip_duration: u64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_demographics(mut self, gender: Option<String>, birth_year: Option<i32>) -> Self {
        self.gender = gender;
        self.birth_year = birth_year;
        self
    }
}

/// Trip records currently in scope, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    city: City,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            records,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new dataset holding only the rows accepted by `spec`.
    ///
    /// The receiver is left untouched and surviving rows keep their order.
    pub fn filter(&self, spec: &FilterSpec) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| spec.matches(r))
            .cloned()
            .collect();

        Dataset {
            city: self.city,
            schema: self.schema,
            records,
        }
    }
}
