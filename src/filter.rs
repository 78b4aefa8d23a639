//! City, month and weekday filters.
//!
//! Every user-supplied value is validated against a fixed enumeration before
//! it reaches the loader. `"all"` disables the corresponding predicate.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};
use serde::Serialize;

use crate::dataset::TripRecord;
use crate::error::{BikeshareError, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Canonical weekday names, Monday first to match `Weekday::num_days_from_monday`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One of the supported bikeshare systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Default source file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| BikeshareError::InvalidFilter {
                kind: "city",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Only(Month),
}

impl MonthFilter {
    fn matches(self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => m.number_from_month() == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(MONTH_NAMES[m.number_from_month() as usize - 1]),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        MONTH_NAMES
            .iter()
            .position(|name| *name == wanted)
            .and_then(|idx| Month::try_from(idx as u8 + 1).ok())
            .map(MonthFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidFilter {
                kind: "month",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    fn matches(self, weekday: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => d == weekday,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("All"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        WEEKDAY_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(wanted))
            .and_then(|idx| Weekday::try_from(idx as u8).ok())
            .map(DayFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidFilter {
                kind: "day",
                value: s.to_string(),
            })
    }
}

/// Capitalized weekday name, e.g. `"Sunday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// The city to load plus the optional month and weekday constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    /// A filter that keeps every row of `city`.
    pub fn all(city: City) -> Self {
        Self {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }

    /// Validates raw user input for all three fields.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month == MonthFilter::All && self.day == DayFilter::All
    }

    /// True when the record satisfies both the month and the day predicate.
    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.matches(record.month) && self.day.matches(record.weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!(" New York City ".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("WASHINGTON".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_city_parse_rejects_unknown() {
        let err = "boston".parse::<City>().unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "invalid city: 'boston'");
    }

    #[test]
    fn test_month_parse_accepts_all_twelve() {
        for (idx, name) in MONTH_NAMES.iter().enumerate() {
            let parsed: MonthFilter = name.parse().unwrap();
            match parsed {
                MonthFilter::Only(m) => assert_eq!(m.number_from_month(), idx as u32 + 1),
                MonthFilter::All => panic!("{name} parsed as all"),
            }
        }
        assert_eq!("ALL".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "July".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(Month::July)
        );
    }

    #[test]
    fn test_month_parse_rejects_misspelling() {
        assert!("febrduary".parse::<MonthFilter>().is_err());
        assert!("jan".parse::<MonthFilter>().is_err());
        assert!("".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_day_parse_and_display() {
        let day: DayFilter = "sunday".parse().unwrap();
        assert_eq!(day, DayFilter::Only(Weekday::Sun));
        assert_eq!(day.to_string(), "Sunday");
        assert_eq!("all".parse::<DayFilter>().unwrap().to_string(), "All");
        assert!("someday".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_weekday_names_line_up_with_chrono() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        for (idx, name) in WEEKDAY_NAMES.iter().enumerate() {
            let parsed: DayFilter = name.parse().unwrap();
            let DayFilter::Only(day) = parsed else {
                panic!("{name} parsed as all");
            };
            assert_eq!(day.num_days_from_monday() as usize, idx);
            assert_eq!(weekday_name(day), *name);
        }
    }

    #[test]
    fn test_filter_spec_parse() {
        let spec = FilterSpec::parse("chicago", "march", "friday").unwrap();
        assert_eq!(spec.city, City::Chicago);
        assert_eq!(spec.month, MonthFilter::Only(Month::March));
        assert_eq!(spec.day, DayFilter::Only(Weekday::Fri));
        assert!(!spec.is_unfiltered());
        assert!(FilterSpec::all(City::Washington).is_unfiltered());
    }

    #[test]
    fn test_filter_spec_parse_reports_bad_field() {
        let err = FilterSpec::parse("chicago", "smarch", "all").unwrap_err();
        assert_eq!(err.to_string(), "invalid month: 'smarch'");
    }
}
