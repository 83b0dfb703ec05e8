//! Paired benchmark runner.
//!
//! Each trial builds one randomized circuit, derives a correction from a
//! freshly generated signal and executes the circuit twice on the same
//! backend: once as generated (baseline) and once with the corrections
//! inserted (stabilized). Both executions share the shot count and the shot
//! seed, so the only difference between them is the correction.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use phaselock_hal::{Backend, ExecutionResult};
use phaselock_ir::Circuit;

use crate::circuits::{STABILIZE_LABEL, generate_echo_circuit, insert_corrections};
use crate::config::BenchConfig;
use crate::error::{BenchResult, ConfigError};
use crate::mapping::map_signal;
use crate::seed::{TrialSeeds, entropy_seed};
use crate::signal::SignalGenerator;

/// Log progress every this many trials.
const PROGRESS_INTERVAL: usize = 20;

/// Error rate of one circuit execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Fingerprint of the executed circuit, corrections excluded.
    pub circuit_fingerprint: u64,
    /// Shots executed.
    pub shots: u32,
    /// Shots that produced the expected outcome.
    pub hits: u64,
    /// `1 - hits / shots`.
    pub error_rate: f64,
}

impl Measurement {
    /// Score an execution result against the expected outcome.
    pub fn from_result(circuit_fingerprint: u64, result: &ExecutionResult, expected: &str) -> Self {
        Self {
            circuit_fingerprint,
            shots: result.shots,
            hits: result.counts.get(expected),
            error_rate: result.error_rate(expected),
        }
    }
}

/// One completed paired trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial index within the run.
    pub index: usize,
    /// Seeds used by this trial.
    pub seed: TrialSeeds,
    /// Ideal outcome both executions are scored against.
    pub expected_outcome: String,
    /// Fingerprint of the base circuit.
    pub circuit_fingerprint: u64,
    /// Correction angles derived from the trial signal.
    pub angles: Vec<f64>,
    /// Uncorrected execution.
    pub baseline: Measurement,
    /// Corrected execution.
    pub stabilized: Measurement,
}

impl TrialRecord {
    /// Whether both executions ran the same base circuit.
    pub fn is_paired(&self) -> bool {
        self.baseline.circuit_fingerprint == self.circuit_fingerprint
            && self.stabilized.circuit_fingerprint == self.circuit_fingerprint
    }
}

/// Step of a trial that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStage {
    /// Building the randomized circuit.
    Circuit,
    /// Evaluating the ideal outcome.
    Expected,
    /// Inserting corrections.
    Stabilize,
    /// Executing the baseline circuit.
    Baseline,
    /// Executing the stabilized circuit.
    Stabilized,
}

impl fmt::Display for TrialStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrialStage::Circuit => "circuit",
            TrialStage::Expected => "expected",
            TrialStage::Stabilize => "stabilize",
            TrialStage::Baseline => "baseline",
            TrialStage::Stabilized => "stabilized",
        };
        f.write_str(name)
    }
}

/// A trial excluded from the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFailure {
    /// Trial index within the run.
    pub index: usize,
    /// Seeds used by this trial.
    pub seed: TrialSeeds,
    /// Step that failed.
    pub stage: TrialStage,
    /// Error message.
    pub message: String,
}

impl TrialFailure {
    fn new(index: usize, seed: TrialSeeds, stage: TrialStage, err: impl fmt::Display) -> Self {
        Self {
            index,
            seed,
            stage,
            message: err.to_string(),
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialTable {
    /// Base seed of the run.
    pub seed: u64,
    /// Trials requested.
    pub requested: usize,
    /// Completed trials in index order.
    pub records: Vec<TrialRecord>,
    /// Excluded trials in index order.
    pub failures: Vec<TrialFailure>,
}

impl TrialTable {
    /// Number of completed trials.
    pub fn successful(&self) -> usize {
        self.records.len()
    }

    /// Number of excluded trials.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Baseline error rates in trial order.
    pub fn baseline_rates(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.baseline.error_rate).collect()
    }

    /// Stabilized error rates in trial order.
    pub fn stabilized_rates(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.stabilized.error_rate).collect()
    }
}

/// Runs paired trials against a backend.
pub struct BenchmarkRunner<'a> {
    config: BenchConfig,
    backend: &'a dyn Backend,
    signal: SignalGenerator,
    seed: u64,
}

impl<'a> BenchmarkRunner<'a> {
    /// Create a runner, resolving the base seed.
    ///
    /// Fails if the configuration is invalid, asks for more qubits than the
    /// backend provides, or names a readout error the backend does not apply.
    pub fn new(config: &BenchConfig, backend: &'a dyn Backend) -> BenchResult<Self> {
        config.validate()?;

        let caps = backend.capabilities();
        if config.qubits > caps.num_qubits {
            return Err(ConfigError::Validation(format!(
                "{} qubits requested but backend '{}' supports {}",
                config.qubits,
                backend.name(),
                caps.num_qubits
            ))
            .into());
        }
        if (config.readout_error - caps.readout_error).abs() > f64::EPSILON {
            return Err(ConfigError::Validation(format!(
                "readout_error is {} but backend '{}' applies {}",
                config.readout_error,
                backend.name(),
                caps.readout_error
            ))
            .into());
        }

        let seed = config.seed.unwrap_or_else(entropy_seed);
        Ok(Self {
            config: config.clone(),
            backend,
            signal: SignalGenerator::new(config.signal),
            seed,
        })
    }

    /// Resolved base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration in use.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run all trials.
    pub fn run(&self) -> TrialTable {
        self.run_with_progress(|_, _| {})
    }

    /// Run all trials, calling `on_trial(completed, total)` after each one.
    pub fn run_with_progress<F>(&self, mut on_trial: F) -> TrialTable
    where
        F: FnMut(usize, usize),
    {
        let total = self.config.trials;
        info!(
            "Starting benchmark: {} trials, {} shots, {} qubits, depth {}, seed {}",
            total, self.config.shots_per_trial, self.config.qubits, self.config.depth, self.seed
        );

        let mut table = TrialTable {
            seed: self.seed,
            requested: total,
            records: Vec::with_capacity(total),
            failures: Vec::new(),
        };

        for index in 0..total {
            match self.run_trial(index) {
                Ok(record) => table.records.push(record),
                Err(failure) => {
                    warn!(
                        "Trial {} failed during {}: {}",
                        failure.index, failure.stage, failure.message
                    );
                    table.failures.push(failure);
                }
            }

            let completed = index + 1;
            if completed % PROGRESS_INTERVAL == 0 {
                info!("Completed {}/{} trials", completed, total);
            }
            on_trial(completed, total);
        }

        info!(
            "Benchmark finished: {}/{} trials succeeded",
            table.successful(),
            total
        );
        table
    }

    /// Run a single trial by index.
    #[instrument(level = "debug", skip(self))]
    pub fn run_trial(&self, index: usize) -> Result<TrialRecord, TrialFailure> {
        let seeds = TrialSeeds::derive(self.seed, index);
        let fail = |stage: TrialStage, err: &dyn fmt::Display| {
            TrialFailure::new(index, seeds, stage, err)
        };
        let cfg = &self.config;

        let base = generate_echo_circuit(cfg.qubits, cfg.depth, cfg.coherent_noise, seeds.circuit)
            .map_err(|e| fail(TrialStage::Circuit, &e))?;

        let signal = self.signal.generate(seeds.signal);
        let signal = if cfg.signal.normalize {
            signal.normalized()
        } else {
            signal
        };
        let angles = map_signal(&signal, cfg.mapping_scale);

        let stabilized = insert_corrections(&base, &angles, cfg.placement)
            .and_then(measured)
            .map_err(|e| fail(TrialStage::Stabilize, &e))?;
        let baseline = measured(base).map_err(|e| fail(TrialStage::Circuit, &e))?;

        let expected = self
            .backend
            .ideal_outcome(&baseline)
            .map_err(|e| fail(TrialStage::Expected, &e))?;
        debug!("Trial {} expects '{}'", index, expected);

        let fingerprint = baseline.fingerprint_excluding(STABILIZE_LABEL);
        let shots = cfg.shots_per_trial;

        let baseline_result = self
            .backend
            .run(&baseline, shots, seeds.shots)
            .map_err(|e| fail(TrialStage::Baseline, &e))?;
        let stabilized_result = self
            .backend
            .run(&stabilized, shots, seeds.shots)
            .map_err(|e| fail(TrialStage::Stabilized, &e))?;

        Ok(TrialRecord {
            index,
            seed: seeds,
            circuit_fingerprint: fingerprint,
            baseline: Measurement::from_result(fingerprint, &baseline_result, &expected),
            stabilized: Measurement::from_result(
                stabilized.fingerprint_excluding(STABILIZE_LABEL),
                &stabilized_result,
                &expected,
            ),
            expected_outcome: expected,
            angles,
        })
    }
}

fn measured(mut circuit: Circuit) -> phaselock_ir::IrResult<Circuit> {
    circuit.measure_all()?;
    Ok(circuit)
}
