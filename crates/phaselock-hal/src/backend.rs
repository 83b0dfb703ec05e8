//! Backend trait.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!   ideal_outcome()   (optional, simulators only)
//! ```
//!
//! Execution is synchronous and seeded: a backend given the same circuit,
//! shot count and seed must return the same counts.

use phaselock_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Trait for circuit execution backends.
///
/// # Contract
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   capabilities at construction time.
/// - `validate()` checks the circuit and shot count before execution. The
///   default implementation checks qubit count and shot limits.
/// - `run()` is deterministic in `(circuit, shots, seed)`.
/// - `ideal_outcome()` returns the most probable bitstring of the noiseless
///   circuit. Backends that cannot compute it return `HalError::Unsupported`.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit and shot count against backend constraints.
    fn validate(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        let caps = self.capabilities();
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but {} only supports {}",
                circuit.num_qubits(),
                self.name(),
                caps.num_qubits
            )));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots exceeds the limit of {}",
                caps.max_shots
            )));
        }
        Ok(())
    }

    /// Execute a circuit for `shots` samples using `seed` for all randomness.
    fn run(&self, circuit: &Circuit, shots: u32, seed: u64) -> HalResult<ExecutionResult>;

    /// Most probable outcome of the circuit with all noise channels removed.
    fn ideal_outcome(&self, _circuit: &Circuit) -> HalResult<String> {
        Err(HalError::Unsupported(format!(
            "{} cannot evaluate ideal outcomes",
            self.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;
    use phaselock_ir::QubitId;

    struct FixedBackend {
        caps: Capabilities,
    }

    impl Backend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn run(&self, circuit: &Circuit, shots: u32, _seed: u64) -> HalResult<ExecutionResult> {
            self.validate(circuit, shots)?;
            let mut counts = Counts::new();
            counts.insert("0".repeat(circuit.num_qubits()), u64::from(shots));
            Ok(ExecutionResult::new(counts, shots))
        }
    }

    fn backend() -> FixedBackend {
        FixedBackend {
            caps: Capabilities::simulator(2).with_max_shots(100),
        }
    }

    #[test]
    fn test_default_validation() {
        let b = backend();
        let small = Circuit::with_size("ok", 2, 0);
        assert!(b.validate(&small, 10).is_ok());

        let large = Circuit::with_size("big", 3, 0);
        assert!(matches!(
            b.validate(&large, 10),
            Err(HalError::CircuitTooLarge(_))
        ));
        assert!(matches!(b.validate(&small, 0), Err(HalError::InvalidShots(_))));
        assert!(matches!(
            b.validate(&small, 101),
            Err(HalError::InvalidShots(_))
        ));
    }

    #[test]
    fn test_ideal_outcome_unsupported_by_default() {
        let b = backend();
        let mut circuit = Circuit::with_size("c", 1, 0);
        circuit.x(QubitId(0)).unwrap();
        assert!(matches!(
            b.ideal_outcome(&circuit),
            Err(HalError::Unsupported(_))
        ));
        let result = b.run(&circuit, 8, 0).unwrap();
        assert_eq!(result.counts.get("0"), 8);
    }
}
