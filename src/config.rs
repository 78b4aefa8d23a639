use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{BikeshareError, Result};
use crate::filter::City;

/// Maps each supported city to the trip export that backs it.
///
/// Overrides can be stored as a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "chicago.csv.gz",
///   "new york city": "/data/nyc/2017.csv"
/// }
/// ```
/// Relative paths resolve against the data directory. Cities not listed keep
/// their default file name.
#[derive(Debug, Clone)]
pub struct CityConfig {
    sources: BTreeMap<City, PathBuf>,
}

impl CityConfig {
    /// Default mapping: every city's stock file name inside `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let sources = City::ALL
            .into_iter()
            .map(|city| (city, data_dir.join(city.file_name())))
            .collect();
        Self { sources }
    }

    /// A config holding only the given mappings.
    pub fn from_sources(sources: impl IntoIterator<Item = (City, PathBuf)>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    /// Loads overrides from a JSON file at `path` on top of the defaults for `data_dir`.
    pub fn load(path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| BikeshareError::SourceOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content, data_dir)
    }

    pub fn from_json(content: &str, data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let entries: HashMap<String, String> = serde_json::from_str(content)?;

        let mut config = Self::with_data_dir(data_dir);
        for (name, source) in entries {
            let city: City = name
                .parse()
                .map_err(|_| BikeshareError::Config(format!("unknown city '{name}'")))?;
            if source.trim().is_empty() {
                return Err(BikeshareError::Config(format!(
                    "empty source path for '{name}'"
                )));
            }
            config.sources.insert(city, data_dir.join(source));
        }

        Ok(config)
    }

    /// Returns the source path for `city`.
    pub fn source_for(&self, city: City) -> Result<&Path> {
        self.sources
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or_else(|| BikeshareError::InvalidCity(city.to_string()))
    }

    /// Iterates over all `(city, path)` pairs in enumeration order.
    pub fn cities(&self) -> impl Iterator<Item = (City, &Path)> {
        self.sources.iter().map(|(c, p)| (*c, p.as_path()))
    }
}
