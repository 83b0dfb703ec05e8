//! Phaselock Circuit Representation
//!
//! Small, fully-bound quantum circuits as a flat list of tagged instructions.
//! The representation is deliberately interpreter-friendly: every gate is a
//! variant of [`StandardGate`] with concrete angles, and noise is an explicit
//! [`NoiseModel`] instruction that a simulator can honour or skip.
//!
//! # Core Components
//!
//! - **Identifiers**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] and labeled [`Gate`]s
//! - **Noise**: [`NoiseModel`] coherent drift channels
//! - **Instructions**: [`Instruction`] combining an operation with operands
//! - **Circuit**: [`Circuit`] validating builder with depth and fingerprinting
//!
//! # Example: an echo layer with drift
//!
//! ```rust
//! use phaselock_ir::{Circuit, NoiseModel, QubitId};
//!
//! let mut circuit = Circuit::with_size("echo", 1, 1);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.noise(NoiseModel::CoherentZ { angle: 0.1 }, QubitId(0)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 1);
//! assert_eq!(circuit.depth(), 4);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use noise::NoiseModel;
pub use qubit::{ClbitId, QubitId};
