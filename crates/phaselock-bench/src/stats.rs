//! Aggregate statistics over a trial table.
//!
//! Per-condition mean and sample standard deviation, a paired t-test on the
//! per-trial differences `baseline − stabilized`, relative improvement and a
//! verdict against a target improvement.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::runner::TrialTable;

/// Significance level of the paired test.
pub const ALPHA: f64 = 0.05;

/// Trials needed before the paired test is defined.
pub const MIN_PAIRED_TRIALS: usize = 2;

/// Arithmetic mean, `None` for no data.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n − 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Mean and spread of one condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionStats {
    /// Number of observations.
    pub n: usize,
    /// Mean error rate.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std_dev: Option<f64>,
}

impl ConditionStats {
    /// Summarize a slice of observations.
    pub fn from_samples(values: &[f64]) -> Self {
        Self {
            n: values.len(),
            mean: mean(values),
            std_dev: sample_std(values),
        }
    }
}

/// Result of the paired t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairedTest {
    /// Test statistic computed over the paired differences.
    Computed {
        t_statistic: f64,
        p_value: f64,
        degrees_of_freedom: usize,
        mean_difference: f64,
        significant: bool,
    },
    /// Fewer than two successful trials.
    InsufficientData { successful: usize },
}

impl PairedTest {
    /// Whether the difference is significant at [`ALPHA`].
    pub fn is_significant(&self) -> bool {
        matches!(self, PairedTest::Computed { significant: true, .. })
    }

    /// Two-sided p-value, if computed.
    pub fn p_value(&self) -> Option<f64> {
        match self {
            PairedTest::Computed { p_value, .. } => Some(*p_value),
            PairedTest::InsufficientData { .. } => None,
        }
    }

    /// Test statistic, if computed.
    pub fn t_statistic(&self) -> Option<f64> {
        match self {
            PairedTest::Computed { t_statistic, .. } => Some(*t_statistic),
            PairedTest::InsufficientData { .. } => None,
        }
    }
}

/// Paired t-test on `baseline[i] − stabilized[i]`.
///
/// Pairs beyond the shorter slice are ignored. When every difference is the
/// same the statistic degenerates: a zero mean gives `t = 0, p = 1`, any
/// other mean gives `t = ±∞, p = 0`.
pub fn paired_t_test(baseline: &[f64], stabilized: &[f64]) -> PairedTest {
    let diffs: Vec<f64> = baseline
        .iter()
        .zip(stabilized)
        .map(|(b, s)| b - s)
        .collect();
    let n = diffs.len();
    if n < MIN_PAIRED_TRIALS {
        return PairedTest::InsufficientData { successful: n };
    }

    let df = n - 1;
    let mean_d = mean(&diffs).unwrap_or(0.0);
    let sd_d = sample_std(&diffs).unwrap_or(0.0);

    let (t, p) = if sd_d == 0.0 {
        if mean_d == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_d.signum() * f64::INFINITY, 0.0)
        }
    } else {
        let t = mean_d / (sd_d / (n as f64).sqrt());
        let p = StudentsT::new(0.0, 1.0, df as f64)
            .map_or(f64::NAN, |dist| 2.0 * (1.0 - dist.cdf(t.abs())));
        (t, p.clamp(0.0, 1.0))
    };

    PairedTest::Computed {
        t_statistic: t,
        p_value: p,
        degrees_of_freedom: df,
        mean_difference: mean_d,
        significant: p < ALPHA,
    }
}

/// Relative improvement of the stabilized mean over the baseline mean, in percent.
///
/// `None` without data; `0` when the baseline mean is not positive.
pub fn improvement_pct(baseline_mean: Option<f64>, stabilized_mean: Option<f64>) -> Option<f64> {
    let (b, s) = (baseline_mean?, stabilized_mean?);
    if b <= 0.0 {
        Some(0.0)
    } else {
        Some((b - s) / b * 100.0)
    }
}

/// Overall classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Improvement at or above target and significant.
    TargetReached,
    /// Some improvement, short of the target or not significant.
    Partial,
    /// No improvement.
    NeedsAdjustment,
    /// Not enough successful trials to judge.
    InsufficientData,
}

impl Verdict {
    /// Classify a run.
    pub fn classify(test: &PairedTest, improvement: Option<f64>, target_pct: f64) -> Self {
        let improvement = match (test, improvement) {
            (PairedTest::InsufficientData { .. }, _) | (_, None) => {
                return Verdict::InsufficientData;
            }
            (_, Some(pct)) => pct,
        };
        if improvement >= target_pct && test.is_significant() {
            Verdict::TargetReached
        } else if improvement > 0.0 {
            Verdict::Partial
        } else {
            Verdict::NeedsAdjustment
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::TargetReached => "target reached",
            Verdict::Partial => "partial improvement",
            Verdict::NeedsAdjustment => "needs adjustment",
            Verdict::InsufficientData => "insufficient data",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Aggregate result derived from a trial table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Trials requested.
    pub requested: usize,
    /// Trials that completed.
    pub successful: usize,
    /// Trials excluded.
    pub failed: usize,
    /// Baseline condition.
    pub baseline: ConditionStats,
    /// Stabilized condition.
    pub stabilized: ConditionStats,
    /// Paired t-test.
    pub test: PairedTest,
    /// Relative improvement in percent.
    pub improvement_pct: Option<f64>,
    /// Target used for the verdict.
    pub target_improvement_pct: f64,
    /// Classification against the target.
    pub verdict: Verdict,
}

impl Summary {
    /// Compute the summary of a run.
    pub fn from_table(table: &TrialTable, target_improvement_pct: f64) -> Self {
        let baseline_rates = table.baseline_rates();
        let stabilized_rates = table.stabilized_rates();

        let baseline = ConditionStats::from_samples(&baseline_rates);
        let stabilized = ConditionStats::from_samples(&stabilized_rates);
        let test = paired_t_test(&baseline_rates, &stabilized_rates);
        let improvement = improvement_pct(baseline.mean, stabilized.mean);

        Self {
            requested: table.requested,
            successful: table.successful(),
            failed: table.failed(),
            baseline,
            stabilized,
            test,
            improvement_pct: improvement,
            target_improvement_pct,
            verdict: Verdict::classify(&test, improvement, target_improvement_pct),
        }
    }

    /// Whether the difference is significant at [`ALPHA`].
    pub fn significant(&self) -> bool {
        self.test.is_significant()
    }

    /// Whether fewer than two trials succeeded.
    pub fn is_insufficient(&self) -> bool {
        matches!(self.test, PairedTest::InsufficientData { .. })
    }
}
