pub mod analyzers;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod parser;
pub mod shell;

pub use error::{BikeshareError, Result};
