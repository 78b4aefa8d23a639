use crate::analyzers::types::{BirthYearStats, Field, UserReport, ValueCount};
use crate::analyzers::utility::{mode, require_rows, value_counts};
use crate::dataset::{Capability, Dataset};
use crate::error::Result;

/// Rider demographics: user-type counts, plus gender counts and birth-year
/// range where the city's export carries those columns.
pub fn user_stats(dataset: &Dataset) -> Result<UserReport> {
    require_rows(dataset, "user")?;
    let records = dataset.records();
    let schema = dataset.schema();

    let user_type_counts = counts(records.iter().filter_map(|r| r.user_type.as_deref()));

    let gender_counts = match schema.gender {
        Capability::Absent => Field::Unavailable,
        Capability::Present => {
            let counts = counts(records.iter().filter_map(|r| r.gender.as_deref()));
            if counts.is_empty() {
                Field::Blank
            } else {
                Field::Available(counts)
            }
        }
    };

    let birth_year = match schema.birth_year {
        Capability::Absent => Field::Unavailable,
        Capability::Present => {
            let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
            birth_year_stats(&years).map_or(Field::Blank, Field::Available)
        }
    };

    Ok(UserReport {
        user_type_counts,
        gender_counts,
        birth_year,
    })
}

fn counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values).into_iter().map(ValueCount::from).collect()
}

fn birth_year_stats(years: &[i32]) -> Option<BirthYearStats> {
    Some(BirthYearStats {
        earliest: *years.iter().min()?,
        latest: *years.iter().max()?,
        most_common: mode(years.iter().copied())?,
    })
}
