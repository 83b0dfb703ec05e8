//! Simulator backend implementation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, instrument};

use phaselock_hal::{Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult};
use phaselock_ir::Circuit;

use crate::statevector::{Statevector, outcome_to_bitstring, sample_cumulative};

/// Local simulator backend.
///
/// This backend simulates quantum circuits using a statevector simulation.
/// It supports circuits up to ~20 qubits (limited by memory). The state is
/// evolved once per run and every shot is sampled from the final
/// distribution, so a run is deterministic in its seed.
pub struct SimulatorBackend {
    /// Cached capabilities, including the readout flip probability.
    caps: Capabilities,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(20)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            caps: Capabilities::simulator(max_qubits),
        }
    }

    /// Set the symmetric readout error probability.
    pub fn with_readout_error(mut self, probability: f64) -> HalResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(HalError::Unsupported(format!(
                "readout error {probability} is outside [0, 1]"
            )));
        }
        self.caps = self.caps.with_readout_error(probability);
        if probability > 0.0 {
            self.caps = self.caps.with_feature("readout_error");
        }
        Ok(self)
    }

    /// Configured readout error probability.
    pub fn readout_error(&self) -> f64 {
        self.caps.readout_error
    }

    fn evolve(circuit: &Circuit, with_noise: bool) -> Statevector {
        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst, with_noise);
        }
        sv
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32, seed: u64) -> ExecutionResult {
        let start = Instant::now();

        let num_qubits = circuit.num_qubits();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            num_qubits, shots
        );
        debug!("Circuit has {} instructions", circuit.num_ops());

        let sv = Self::evolve(circuit, true);
        let cumulative = sv.cumulative();
        let mut rng = StdRng::seed_from_u64(seed);
        let readout_error = self.caps.readout_error;

        let mut tally: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            let mut outcome = sample_cumulative(&cumulative, &mut rng);
            if readout_error > 0.0 {
                for q in 0..num_qubits {
                    if rng.r#gen::<f64>() < readout_error {
                        outcome ^= 1 << q;
                    }
                }
            }
            *tally.entry(outcome).or_insert(0) += 1;
        }

        let mut counts = Counts::new();
        for (outcome, count) in tally {
            counts.insert(outcome_to_bitstring(outcome, num_qubits), count);
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_micros() as u64)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.caps.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn run(&self, circuit: &Circuit, shots: u32, seed: u64) -> HalResult<ExecutionResult> {
        self.validate(circuit, shots)?;
        Ok(self.run_simulation(circuit, shots, seed))
    }

    fn ideal_outcome(&self, circuit: &Circuit) -> HalResult<String> {
        if circuit.num_qubits() > self.caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.caps.num_qubits
            )));
        }
        let sv = Self::evolve(circuit, false);
        Ok(sv.outcome_to_bitstring(sv.most_likely()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaselock_ir::{NoiseModel, QubitId};

    fn echo(eps: f64) -> Circuit {
        let mut circuit = Circuit::with_size("echo", 2, 0);
        for q in 0..2 {
            circuit
                .h(QubitId(q))
                .unwrap()
                .noise(NoiseModel::CoherentZ { angle: eps }, QubitId(q))
                .unwrap()
                .h(QubitId(q))
                .unwrap();
        }
        circuit.x(QubitId(1)).unwrap();
        circuit.measure_all().unwrap();
        circuit
    }

    #[test]
    fn test_simulator_capabilities() {
        let sim = SimulatorBackend::new();
        let caps = sim.capabilities();
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
        assert!(caps.supports_ideal_outcome);
    }

    #[test]
    fn test_deterministic_circuit() {
        let sim = SimulatorBackend::new();
        let result = sim.run(&echo(0.0), 500, 7).unwrap();
        assert_eq!(result.counts.get("01"), 500);
        assert_eq!(result.error_rate("01"), 0.0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let sim = SimulatorBackend::new();
        let circuit = echo(0.8);
        let a = sim.run(&circuit, 1024, 99).unwrap();
        let b = sim.run(&circuit, 1024, 99).unwrap();
        assert_eq!(a.counts, b.counts);
        assert_eq!(a.counts.total_shots(), 1024);
    }

    #[test]
    fn test_ideal_outcome_ignores_noise() {
        let sim = SimulatorBackend::new();
        assert_eq!(sim.ideal_outcome(&echo(2.5)).unwrap(), "01");
    }

    #[test]
    fn test_noise_raises_error_rate() {
        let sim = SimulatorBackend::new();
        // P(flip) per qubit = sin²(1.2/2) ≈ 0.32
        let result = sim.run(&echo(1.2), 4096, 3).unwrap();
        let rate = result.error_rate("01");
        assert!(rate > 0.4 && rate < 0.65, "rate = {rate}");
    }

    #[test]
    fn test_readout_error() {
        let sim = SimulatorBackend::new().with_readout_error(1.0).unwrap();
        let result = sim.run(&echo(0.0), 100, 1).unwrap();
        assert_eq!(result.counts.get("10"), 100);

        assert!(SimulatorBackend::new().with_readout_error(1.5).is_err());
    }

    #[test]
    fn test_rejects_oversized_circuit() {
        let sim = SimulatorBackend::with_max_qubits(1);
        let err = sim.run(&echo(0.0), 10, 0).unwrap_err();
        assert!(matches!(err, HalError::CircuitTooLarge(_)));
        assert!(sim.ideal_outcome(&echo(0.0)).is_err());
    }

    #[test]
    fn test_rejects_zero_shots() {
        let sim = SimulatorBackend::new();
        let err = sim.run(&echo(0.0), 0, 0).unwrap_err();
        assert!(matches!(err, HalError::InvalidShots(_)));
    }
}
