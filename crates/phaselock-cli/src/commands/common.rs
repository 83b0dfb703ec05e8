//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use phaselock_bench::BenchConfig;

/// Output format of `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

/// Output format of `signal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignalFormat {
    /// Aligned columns
    Table,
    /// JSON document
    Json,
}

/// Load the configuration file (if any) and apply environment overrides.
///
/// Command-line overrides are applied by the caller, which validates again.
pub fn load_config(path: Option<&str>) -> Result<BenchConfig> {
    if let Some(path) = path {
        if !Path::new(path).exists() {
            anyhow::bail!("File not found: {path}");
        }
    }
    BenchConfig::load(path.map(Path::new)).with_context(|| match path {
        Some(path) => format!("Failed to load configuration: {path}"),
        None => "Invalid environment override".to_string(),
    })
}

/// Write `content` to `path`.
pub fn write_file(path: &str, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))
}
