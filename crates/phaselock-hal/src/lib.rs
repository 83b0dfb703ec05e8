//! Phaselock Hardware Abstraction Layer
//!
//! A minimal, synchronous execution contract between circuit producers and
//! simulators:
//! - the [`Backend`] trait for validation, seeded execution, and ideal-outcome
//!   queries
//! - [`Capabilities`] describing backend limits
//! - [`ExecutionResult`] and [`Counts`] for measurement data
//!
//! # Implementing a Custom Backend
//!
//! ```rust
//! use phaselock_hal::{Backend, Capabilities, Counts, ExecutionResult, HalResult};
//! use phaselock_ir::Circuit;
//!
//! struct AllZeros {
//!     caps: Capabilities,
//! }
//!
//! impl Backend for AllZeros {
//!     fn name(&self) -> &str { "all_zeros" }
//!
//!     fn capabilities(&self) -> &Capabilities { &self.caps }
//!
//!     fn run(&self, circuit: &Circuit, shots: u32, _seed: u64) -> HalResult<ExecutionResult> {
//!         self.validate(circuit, shots)?;
//!         let mut counts = Counts::new();
//!         counts.insert("0".repeat(circuit.num_qubits()), u64::from(shots));
//!         Ok(ExecutionResult::new(counts, shots))
//!     }
//! }
//!
//! let backend = AllZeros { caps: Capabilities::simulator(4) };
//! let circuit = Circuit::with_size("c", 2, 2);
//! let result = backend.run(&circuit, 100, 7).unwrap();
//! assert_eq!(result.error_rate("00"), 0.0);
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::Backend;
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use result::{Counts, ExecutionResult};
