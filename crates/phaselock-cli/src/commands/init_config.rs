//! Init-config command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use phaselock_bench::BenchConfig;

use super::common::write_file;

/// Execute the init-config command.
pub fn execute(output: Option<&str>, force: bool) -> Result<()> {
    let yaml = BenchConfig::default()
        .to_yaml()
        .context("Failed to serialize default configuration")?;

    match output {
        Some(path) => {
            if Path::new(path).exists() && !force {
                anyhow::bail!("{path} already exists (use --force to overwrite)");
            }
            write_file(path, &yaml)?;
            println!(
                "{} Wrote default configuration to {}",
                style("✓").green().bold(),
                style(path).green()
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}
