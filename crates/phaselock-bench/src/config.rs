//! Benchmark configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML or JSON, chosen by extension)
//! 2. Environment variables (with `PHASELOCK_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::circuits::Placement;
use crate::error::{ConfigError, ConfigResult};
use crate::mapping::DEFAULT_SCALE;
use crate::signal::SignalParams;

/// Largest register the benchmark accepts.
pub const MAX_QUBITS: u32 = 20;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PHASELOCK_";

/// Complete benchmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of paired trials.
    pub trials: usize,
    /// Shots per circuit execution.
    pub shots_per_trial: u32,
    /// Qubits per circuit.
    pub qubits: u32,
    /// Echo layers per circuit.
    pub depth: usize,
    /// Base seed. Drawn from entropy when absent and recorded in the report.
    pub seed: Option<u64>,
    /// Bound of the uniform coherent Z drift per echo layer, in radians.
    pub coherent_noise: f64,
    /// Symmetric per-qubit readout flip probability.
    pub readout_error: f64,
    /// Angle produced by a full-scale sample.
    pub mapping_scale: f64,
    /// Where corrections are inserted.
    pub placement: Placement,
    /// Improvement (percent) needed for a `TargetReached` verdict.
    pub target_improvement_pct: f64,
    /// Synthetic signal parameters.
    pub signal: SignalParams,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            shots_per_trial: 1024,
            qubits: 3,
            depth: 5,
            seed: None,
            coherent_noise: 0.15,
            readout_error: 0.0,
            mapping_scale: DEFAULT_SCALE,
            placement: Placement::default(),
            target_improvement_pct: 15.0,
            signal: SignalParams::default(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: BenchConfig = if is_json {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => BenchConfig::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PHASELOCK_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_env_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Only variables that are present override the current values. A value
    /// that does not parse is an error rather than being ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_value(&lookup, "TRIALS")? {
            self.trials = v;
        }
        if let Some(v) = env_value(&lookup, "SHOTS")? {
            self.shots_per_trial = v;
        }
        if let Some(v) = env_value(&lookup, "QUBITS")? {
            self.qubits = v;
        }
        if let Some(v) = env_value(&lookup, "DEPTH")? {
            self.depth = v;
        }
        if let Some(v) = env_value(&lookup, "SEED")? {
            self.seed = Some(v);
        }
        if let Some(v) = env_value(&lookup, "NOISE_AMPLITUDE")? {
            self.signal.noise_amplitude = v;
        }
        if let Some(v) = env_value(&lookup, "TARGET_FREQUENCY")? {
            self.signal.target_frequency = v;
        }
        if let Some(v) = env_value(&lookup, "COHERENT_NOISE")? {
            self.coherent_noise = v;
        }
        if let Some(v) = env_value(&lookup, "READOUT_ERROR")? {
            self.readout_error = v;
        }
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shots_per_trial == 0 {
            return Err(ConfigError::Validation(
                "shots_per_trial must be greater than 0".to_string(),
            ));
        }
        if self.qubits == 0 || self.qubits > MAX_QUBITS {
            return Err(ConfigError::Validation(format!(
                "qubits must be between 1 and {MAX_QUBITS}, got {}",
                self.qubits
            )));
        }
        if self.depth == 0 {
            return Err(ConfigError::Validation(
                "depth must be greater than 0".to_string(),
            ));
        }

        non_negative("coherent_noise", self.coherent_noise)?;
        non_negative("mapping_scale", self.mapping_scale)?;
        non_negative("signal.noise_amplitude", self.signal.noise_amplitude)?;
        positive("signal.target_frequency", self.signal.target_frequency)?;
        positive("signal.sample_rate", self.signal.sample_rate)?;
        positive("signal.duration", self.signal.duration)?;
        finite("signal.amplitude", self.signal.amplitude)?;
        finite("signal.phase_offset", self.signal.phase_offset)?;
        finite("target_improvement_pct", self.target_improvement_pct)?;

        if !(0.0..=1.0).contains(&self.readout_error) {
            return Err(ConfigError::Validation(format!(
                "readout_error must be within [0, 1], got {}",
                self.readout_error
            )));
        }

        Ok(())
    }

    /// Serialize to YAML, the format written by `init-config`.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn env_value<T, F>(lookup: &F, suffix: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let var = format!("{ENV_PREFIX}{suffix}");
    match lookup(&var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
    }
}

fn finite(name: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> ConfigResult<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> ConfigResult<()> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{name} must be greater than 0, got {value}"
        )));
    }
    Ok(())
}
