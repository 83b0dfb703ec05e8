//! Phaselock Local Statevector Simulator
//!
//! Exact statevector simulation of `phaselock-ir` circuits, exposed through
//! the synchronous [`Backend`](phaselock_hal::Backend) trait.
//!
//! # Features
//!
//! - **Exact Simulation**: Full statevector representation
//! - **Coherent Noise**: Noise channels are applied in noisy runs and skipped
//!   when computing the ideal outcome
//! - **Seeded Sampling**: Shots are drawn from a seeded RNG, so a run repeats
//!   exactly for the same seed
//! - **Readout Error**: Optional symmetric per-qubit bit flips on measurement
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```
//! use phaselock_adapter_sim::SimulatorBackend;
//! use phaselock_hal::Backend;
//! use phaselock_ir::{Circuit, QubitId};
//!
//! let backend = SimulatorBackend::new();
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//! circuit.measure_all()?;
//!
//! let result = backend.run(&circuit, 1000, 42)?;
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
