mod cli;
mod json;

pub use cli::{print_discovery_table, print_index_table};
pub use json::print_json;

use crate::model::{DiscoveryReport, IndexReport};
use anyhow::Result;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for downstream tooling
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_index(report: &IndexReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_index_table(report),
        OutputFormat::Json => print_json(report),
    }
}

pub fn print_files(report: &DiscoveryReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_discovery_table(report),
        OutputFormat::Json => print_json(report),
    }
}
