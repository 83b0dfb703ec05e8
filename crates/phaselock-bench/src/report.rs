//! Benchmark reports: text summary and JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use uuid::Uuid;

use crate::config::BenchConfig;
use crate::error::BenchResult;
use crate::runner::{TrialFailure, TrialRecord, TrialTable};
use crate::stats::{ALPHA, ConditionStats, MIN_PAIRED_TRIALS, PairedTest, Summary};

/// Version of the JSON report layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Failures listed individually in the text summary.
const MAX_LISTED_FAILURES: usize = 10;

/// Complete record of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    /// Report layout version.
    pub schema_version: u32,
    /// Unique run identifier.
    pub run_id: String,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Crate version that produced the report.
    pub version: String,
    /// Backend the trials ran on.
    pub backend: String,
    /// Resolved base seed.
    pub seed: u64,
    /// Configuration of the run.
    pub config: BenchConfig,
    /// Aggregate statistics.
    pub summary: Summary,
    /// Excluded trials.
    pub failures: Vec<TrialFailure>,
    /// Per-trial rows, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trials: Option<Vec<TrialRecord>>,
}

impl BenchReport {
    /// Build a report from a finished run.
    pub fn new(config: &BenchConfig, backend: impl Into<String>, table: &TrialTable) -> Self {
        let mut config = config.clone();
        config.seed = Some(table.seed);
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend: backend.into(),
            seed: table.seed,
            summary: Summary::from_table(table, config.target_improvement_pct),
            config,
            failures: table.failures.clone(),
            trials: None,
        }
    }

    /// Attach the per-trial rows of `table`.
    #[must_use]
    pub fn with_trials(mut self, table: &TrialTable) -> Self {
        self.trials = Some(table.records.clone());
        self
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON document to `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> BenchResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    /// Human-readable outcome summary.
    pub fn render_text(&self) -> String {
        render_text(self)
    }
}

fn format_condition(stats: &ConditionStats) -> String {
    match (stats.mean, stats.std_dev) {
        (Some(m), Some(sd)) => format!("{m:.4} ± {sd:.4}"),
        (Some(m), None) => format!("{m:.4} ± n/a"),
        _ => "n/a".to_string(),
    }
}

/// Render the text summary of a report.
pub fn render_text(report: &BenchReport) -> String {
    let s = &report.summary;
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "RESULTS");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Trials:      {}/{} trials succeeded",
        s.successful, s.requested
    );
    let _ = writeln!(out, "Seed:        {}", report.seed);
    let _ = writeln!(out, "Baseline:    {}", format_condition(&s.baseline));
    let _ = writeln!(out, "Stabilized:  {}", format_condition(&s.stabilized));
    match s.improvement_pct {
        Some(pct) => {
            let _ = writeln!(out, "Improvement: {pct:+.1}%");
        }
        None => {
            let _ = writeln!(out, "Improvement: n/a");
        }
    }

    match &s.test {
        PairedTest::Computed {
            t_statistic,
            p_value,
            degrees_of_freedom,
            significant,
            ..
        } => {
            let _ = writeln!(
                out,
                "t-statistic: {t_statistic:.4} (df = {degrees_of_freedom})"
            );
            let marker = if *significant {
                "significant"
            } else {
                "not significant"
            };
            let _ = writeln!(out, "p-value:     {p_value:.6} ({marker} at α = {ALPHA})");
        }
        PairedTest::InsufficientData { successful } => {
            let _ = writeln!(
                out,
                "Warning: insufficient data: {successful} successful trial(s), \
                 at least {MIN_PAIRED_TRIALS} required for the paired test"
            );
        }
    }

    let _ = writeln!(
        out,
        "Verdict:     {} (target {:.1}%)",
        s.verdict, s.target_improvement_pct
    );

    if !report.failures.is_empty() {
        let _ = writeln!(out, "Failed trials:");
        for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
            let _ = writeln!(
                out,
                "  #{} ({}): {}",
                failure.index, failure.stage, failure.message
            );
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            let _ = writeln!(
                out,
                "  ... and {} more",
                report.failures.len() - MAX_LISTED_FAILURES
            );
        }
    }

    let _ = write!(out, "{rule}");
    out
}
