//! Error taxonomy for loading, filtering and summarizing trip data.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BikeshareError>;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("invalid {kind}: '{value}'")]
    InvalidFilter { kind: &'static str, value: String },

    #[error("no source file configured for city '{0}'")]
    InvalidCity(String),

    #[error("failed to open source file {}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source file {}{}: {message}", .path.display(), line_suffix(.line))]
    SourceParse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    #[error("failed to read CSV from {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot compute {0} statistics over an empty dataset")]
    EmptyDataset(&'static str),

    #[error("invalid city configuration: {0}")]
    Config(String),

    #[error("failed to parse city configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

impl BikeshareError {
    /// True for errors the shell recovers from by asking again.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, BikeshareError::InvalidFilter { .. })
    }
}
