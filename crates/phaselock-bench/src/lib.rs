//! Paired error-rate benchmark for signal-derived phase corrections.
//!
//! A run consists of independent trials. Each trial:
//!
//! 1. builds a randomized echo circuit with coherent Z drift ([`circuits`]),
//! 2. generates a short synthetic signal ([`signal`]) and maps it to bounded
//!    rotation angles ([`mapping`]),
//! 3. executes the circuit as generated and with the counter-rotations
//!    inserted, on the same backend with the same shot seed ([`runner`]).
//!
//! The trial table is then summarized with a paired t-test ([`stats`]) and
//! rendered as text, JSON ([`report`]) or SVG ([`plot`]).
//!
//! # Example
//!
//! ```
//! use phaselock_adapter_sim::SimulatorBackend;
//! use phaselock_bench::{BenchConfig, BenchReport, BenchmarkRunner};
//!
//! let config = BenchConfig {
//!     trials: 10,
//!     shots_per_trial: 256,
//!     seed: Some(42),
//!     ..BenchConfig::default()
//! };
//! let backend = SimulatorBackend::new();
//! let table = BenchmarkRunner::new(&config, &backend)?.run();
//!
//! let report = BenchReport::new(&config, "simulator", &table);
//! assert_eq!(report.summary.successful, 10);
//! println!("{}", report.render_text());
//! # Ok::<(), phaselock_bench::BenchError>(())
//! ```

pub mod circuits;
pub mod config;
pub mod error;
pub mod mapping;
pub mod plot;
pub mod report;
pub mod runner;
pub mod seed;
pub mod signal;
pub mod stats;

pub use circuits::{Placement, STABILIZE_LABEL, generate_echo_circuit, insert_corrections};
pub use config::{BenchConfig, MAX_QUBITS};
pub use error::{BenchError, BenchResult, ConfigError, ConfigResult};
pub use mapping::{DEFAULT_SCALE, map_phase, map_signal};
pub use report::BenchReport;
pub use runner::{BenchmarkRunner, Measurement, TrialFailure, TrialRecord, TrialStage, TrialTable};
pub use seed::TrialSeeds;
pub use signal::{Signal, SignalGenerator, SignalParams};
pub use stats::{ALPHA, ConditionStats, PairedTest, Summary, Verdict};
