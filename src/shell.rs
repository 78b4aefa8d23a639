//! Interactive prompt loop.
//!
//! Collects a city/month/day filter, offers a paged preview of the raw
//! export, prints the four reports and asks whether to start over. Nothing
//! carries over between cycles. End of input at any prompt ends the session.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, warn};

use crate::analyzers::{duration_stats, station_stats, time_stats, user_stats};
use crate::config::CityConfig;
use crate::dataset::Dataset;
use crate::error::BikeshareError;
use crate::filter::{City, DayFilter, FilterSpec, MonthFilter};
use crate::loader::{self, SAMPLE_PAGE_SIZE};
use crate::output::{
    RULE, render_duration, render_sample, render_stations, render_time, render_users,
};

pub struct Shell<'a, R, W> {
    config: &'a CityConfig,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(config: &'a CityConfig, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs filter/report cycles until the user declines a restart or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(spec) = self.get_filters()? else {
                break;
            };
            self.run_cycle(&spec)?;

            match self.read_line("\nWould you like to restart? Enter yes or no.\n")? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("yes") => continue,
                _ => break,
            }
        }
        debug!("Shell session finished");
        Ok(())
    }

    /// Prompts for city, optional raw preview, month and day.
    ///
    /// Returns `None` when input ends before all three values are known.
    pub fn get_filters(&mut self) -> Result<Option<FilterSpec>> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;
        writeln!(
            self.output,
            "\nChoose a city, month and weekday to get specified data"
        )?;

        let Some(city) = self.ask::<City>(
            "Type chicago, new york city or washington: ",
            "Try Again: the city that you typed is not available.\n",
        )?
        else {
            return Ok(None);
        };

        writeln!(self.output, "\nBefore We Continue Filtering... ")?;
        if !self.preview(city)? {
            return Ok(None);
        }

        let Some(month) = self.ask::<MonthFilter>(
            "Type a month (all, january, february, ... , december): ",
            "Try Again: the month that you typed is not available.\n",
        )?
        else {
            return Ok(None);
        };

        let Some(day) = self.ask::<DayFilter>(
            "Type a day of week (all, monday, tuesday, ... sunday): ",
            "\nTry Again: the day that you typed is not available.\n",
        )?
        else {
            return Ok(None);
        };

        writeln!(self.output, "{RULE}")?;
        Ok(Some(FilterSpec { city, month, day }))
    }

    /// Loads the filtered dataset and prints every report.
    ///
    /// A load failure ends the cycle with a message instead of an error.
    pub fn run_cycle(&mut self, spec: &FilterSpec) -> Result<()> {
        let dataset = match loader::load(self.config, spec) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(error = %e, "Load failed");
                writeln!(self.output, "\nCould not load data for {}: {e}", spec.city)?;
                writeln!(self.output, "{RULE}")?;
                return Ok(());
            }
        };

        if !spec.is_unfiltered() {
            writeln!(
                self.output,
                "\nREAD: If you specified a day or month those also will be the most common."
            )?;
        }

        self.section(
            "Calculating The Most Frequent Times of Travel...",
            &dataset,
            |ds| time_stats(ds).map(|r| render_time(&r)),
        )?;
        self.section(
            "Calculating The Most Popular Stations and Trip...",
            &dataset,
            |ds| station_stats(ds).map(|r| render_stations(&r)),
        )?;
        self.section("Calculating Trip Duration...", &dataset, |ds| {
            duration_stats(ds).map(|r| render_duration(&r))
        })?;
        self.section("Calculating User Stats...", &dataset, |ds| {
            user_stats(ds).map(|r| render_users(&r))
        })?;

        Ok(())
    }

    fn section<F>(&mut self, title: &str, dataset: &Dataset, report: F) -> Result<()>
    where
        F: FnOnce(&Dataset) -> crate::error::Result<String>,
    {
        writeln!(self.output, "\n{title}\n")?;
        let started = Instant::now();

        match report(dataset) {
            Ok(text) => write!(self.output, "{text}")?,
            Err(e) => {
                debug!(error = %e, "Report skipped");
                writeln!(self.output, "{e}")?;
                if let BikeshareError::EmptyDataset(_) = e {
                    writeln!(self.output, "No trips match the selected filters.")?;
                }
            }
        }

        writeln!(
            self.output,
            "\nThis took {:.6} seconds.",
            started.elapsed().as_secs_f64()
        )?;
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    /// Pages through the raw export while the user keeps answering "yes".
    ///
    /// Returns `false` when input ends.
    fn preview(&mut self, city: City) -> Result<bool> {
        let mut offset = 0;
        loop {
            let Some(answer) = self.read_line(
                "\nWould you like to look at a sample of the data. Enter yes or no: ",
            )?
            else {
                return Ok(false);
            };
            if !answer.trim().eq_ignore_ascii_case("yes") {
                return Ok(true);
            }

            match loader::sample(self.config, city, offset, SAMPLE_PAGE_SIZE) {
                Ok(page) if page.is_exhausted() => {
                    writeln!(self.output, "There are no more rows to show.")?;
                    return Ok(true);
                }
                Ok(page) => {
                    writeln!(self.output, "{}", render_sample(&page))?;
                    offset += SAMPLE_PAGE_SIZE;
                }
                Err(e) => {
                    warn!(error = %e, "Sample preview failed");
                    writeln!(self.output, "Could not read a sample: {e}")?;
                    return Ok(true);
                }
            }
        }
    }

    /// Asks until the answer parses, printing `retry` after each invalid one.
    fn ask<T>(&mut self, prompt: &str, retry: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = BikeshareError>,
    {
        loop {
            let Some(answer) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) if e.is_invalid_input() => {
                    debug!(input = %answer.trim(), "Rejected input");
                    writeln!(self.output, "{retry}")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
