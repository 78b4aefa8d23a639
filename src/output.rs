//! Output formatting for trip reports.
//!
//! Supports plain-text rendering for the interactive shell, debug
//! pretty-printing to the log, and JSON serialization.

use std::fmt::Write;

use anyhow::Result;
use chrono::Month;
use tracing::debug;

use crate::analyzers::Reports;
use crate::analyzers::types::{
    DurationReport, Field, StationReport, TimeReport, UserReport, ValueCount,
};
use crate::loader::RawSample;

pub const RULE: &str = "----------------------------------------";

/// Logs the reports using Rust's debug pretty-print format.
pub fn print_pretty(reports: &Reports) {
    debug!("{:#?}", reports);
}

/// Serializes the reports as pretty-printed JSON.
pub fn to_json(reports: &Reports) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Breaks a number of seconds into days, hours, minutes and seconds,
/// dropping leading zero units: `3725` becomes `"1h 2m 5s"`.
pub fn format_seconds(total: u128) -> String {
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let units = [(days, "d"), (hours, "h"), (minutes, "m")];
    let mut out = String::new();
    for (value, suffix) in units {
        if value > 0 || !out.is_empty() {
            let _ = write!(out, "{value}{suffix} ");
        }
    }
    let _ = write!(out, "{seconds}s");
    out
}

pub fn render_time(report: &TimeReport) -> String {
    format!(
        "Most Popular Month: {}\nMost Popular Day of Week: {}\nMost Popular Start Hour: {}\n",
        month_name(report.popular_month),
        report.popular_day,
        report.popular_hour,
    )
}

pub fn render_stations(report: &StationReport) -> String {
    format!(
        "Most Popular Starting Station: {}\nMost Popular Ending Station: {}\n\
         Most Popular Combination of Start & End Stations:\n  Start Station: {}\n  End Station: {}\n",
        report.popular_start,
        report.popular_end,
        report.popular_trip.start,
        report.popular_trip.end,
    )
}

pub fn render_duration(report: &DurationReport) -> String {
    format!(
        "Total Travel Time: {} seconds ({})\nMean Travel Time: {:.2} seconds\n",
        report.total,
        format_seconds(report.total),
        report.mean,
    )
}

pub fn render_users(report: &UserReport) -> String {
    let mut out = String::from("Counts of User Types:\n");
    push_counts(&mut out, &report.user_type_counts);

    out.push_str("\nCounts of Gender:\n");
    match &report.gender_counts {
        Field::Available(counts) => push_counts(&mut out, counts),
        Field::Unavailable => out.push_str("  There is no gender data in this city\n"),
        Field::Blank => out.push_str("  No gender recorded for the selected trips\n"),
    }

    out.push_str("\nBirth Year Information:\n");
    match &report.birth_year {
        Field::Available(years) => {
            let _ = writeln!(out, "  Earliest Year of Birth: {}", years.earliest);
            let _ = writeln!(out, "  Most Recent Year of Birth: {}", years.latest);
            let _ = writeln!(out, "  Most Common Year of Birth: {}", years.most_common);
        }
        Field::Unavailable => out.push_str("  There is no birth year data in this city\n"),
        Field::Blank => out.push_str("  No birth year recorded for the selected trips\n"),
    }

    out
}

fn push_counts(out: &mut String, counts: &[ValueCount]) {
    if counts.is_empty() {
        out.push_str("  (none)\n");
    }
    for vc in counts {
        let _ = writeln!(out, "  {}: {}", vc.value, vc.count);
    }
}

/// Renders a page of raw rows as `header: value` blocks.
pub fn render_sample(sample: &RawSample) -> String {
    let mut out = String::new();
    for (i, row) in sample.rows.iter().enumerate() {
        let _ = writeln!(out, "[row {}]", sample.offset + i);
        for (header, value) in sample.headers.iter().zip(row) {
            let label = if header.is_empty() { "#" } else { header.as_str() };
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    out
}

/// Renders every report, separated by rules.
pub fn render_all(reports: &Reports) -> String {
    let separator = format!("{RULE}\n");
    [
        render_time(&reports.time),
        render_stations(&reports.stations),
        render_duration(&reports.duration),
        render_users(&reports.users),
    ]
    .join(separator.as_str())
}
