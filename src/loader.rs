//! Loads a city's trip export and applies the month/day filter.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use flate2::read::GzDecoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CityConfig;
use crate::dataset::Dataset;
use crate::error::{BikeshareError, Result};
use crate::filter::{City, FilterSpec};
use crate::parser::parse_trips;

/// Rows shown per page of the raw-data preview.
pub const SAMPLE_PAGE_SIZE: usize = 5;

/// Opens a source file, transparently decompressing `.gz` exports.
pub fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|source| BikeshareError::SourceOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads every trip for `city` without filtering.
pub fn load_unfiltered(config: &CityConfig, city: City) -> Result<Dataset> {
    let path = config.source_for(city)?;
    let reader = open_source(path)?;
    parse_trips(reader, city, path)
}

/// Reads the trips for `spec.city` and keeps the rows matching its month and
/// day constraints.
#[tracing::instrument(skip(config, spec), fields(city = %spec.city, month = %spec.month, day = %spec.day))]
pub fn load(config: &CityConfig, spec: &FilterSpec) -> Result<Dataset> {
    let dataset = load_unfiltered(config, spec.city)?;
    if spec.is_unfiltered() {
        info!(rows = dataset.len(), "Loaded dataset");
        return Ok(dataset);
    }

    let filtered = dataset.filter(spec);
    info!(
        source_rows = dataset.len(),
        rows = filtered.len(),
        "Loaded filtered dataset"
    );
    Ok(filtered)
}

/// A page of raw source rows, exactly as stored in the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSample {
    pub offset: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSample {
    /// True once the preview has run past the last row.
    pub fn is_exhausted(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Returns source rows `[offset, offset + rows)` for `city`.
pub fn sample(config: &CityConfig, city: City, offset: usize, rows: usize) -> Result<RawSample> {
    let path = config.source_for(city)?;
    let mut rdr = csv::ReaderBuilder::new().from_reader(open_source(path)?);
    let csv_err = |source| BikeshareError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.iter().map(str::to_string).collect();
    let page = rdr
        .records()
        .skip(offset)
        .take(rows)
        .map(|r| r.map(|rec: StringRecord| rec.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, _>>()
        .map_err(csv_err)?;

    debug!(city = %city, offset, returned = page.len(), "Read raw sample");

    Ok(RawSample {
        offset,
        headers,
        rows: page,
    })
}
