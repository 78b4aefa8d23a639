//! Report types produced by the statistics engine.
//!
//! Reports are plain values: built once per computation and never mutated.

use serde::Serialize;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeReport {
    /// 1 = January.
    pub popular_month: u32,
    pub popular_day: String,
    /// 0..=23.
    pub popular_hour: u32,
}

/// A start/end station combination treated as one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationReport {
    pub popular_start: String,
    pub popular_end: String,
    pub popular_trip: StationPair,
}

/// Total and mean trip duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    pub trips: usize,
    pub total: u128,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl From<(&str, usize)> for ValueCount {
    fn from((value, count): (&str, usize)) -> Self {
        Self {
            value: value.to_string(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}

/// Result for an optional demographic column.
///
/// `Unavailable` means the city's export has no such column at all, which is
/// different from `Blank` (column exists, every in-scope cell is empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Field<T> {
    Available(T),
    Unavailable,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReport {
    /// Most frequent first.
    pub user_type_counts: Vec<ValueCount>,
    pub gender_counts: Field<Vec<ValueCount>>,
    pub birth_year: Field<BirthYearStats>,
}

impl UserReport {
    pub fn user_type_count(&self, user_type: &str) -> Option<usize> {
        self.user_type_counts
            .iter()
            .find(|vc| vc.value == user_type)
            .map(|vc| vc.count)
    }
}
