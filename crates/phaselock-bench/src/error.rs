//! Error types for the benchmark crate.

use phaselock_hal::HalError;
use phaselock_ir::IrError;
use thiserror::Error;

/// Configuration errors. All of them are raised before the first trial runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors from running or reporting a benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    #[error("Backend error: {0}")]
    Hal(#[from] HalError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
