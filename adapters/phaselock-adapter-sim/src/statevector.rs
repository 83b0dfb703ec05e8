//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use phaselock_ir::{Instruction, InstructionKind, NoiseModel, StandardGate};

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitudes in computational-basis order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply an instruction to the statevector.
    ///
    /// Noise channels are applied only when `with_noise` is set. Measurements
    /// and barriers do not modify the state; sampling happens at the end.
    pub fn apply(&mut self, instruction: &Instruction, with_noise: bool) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
                self.apply_standard_gate(&gate.kind, &qubits);
            }
            InstructionKind::NoiseChannel(model) => {
                if with_noise {
                    self.apply_noise(model, instruction.qubits[0].index());
                }
            }
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
    }

    fn apply_noise(&mut self, model: &NoiseModel, qubit: usize) {
        match *model {
            NoiseModel::CoherentZ { angle } => self.apply_rz(qubit, angle),
            NoiseModel::CoherentX { angle } => self.apply_rx(qubit, angle),
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match *gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], theta),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], theta),

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= phase_0;
            } else {
                *amp *= phase_1;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                *amp = -*amp;
            }
        }
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Outcome probabilities in computational-basis order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Index of the most probable basis state; ties break towards the lower index.
    pub fn most_likely(&self) -> usize {
        let mut best = 0;
        let mut best_p = f64::NEG_INFINITY;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            // Tolerance keeps rounding noise from splitting exact ties.
            if p > best_p + 1e-12 {
                best = i;
                best_p = p;
            }
        }
        best
    }

    /// Cumulative distribution over basis states, for repeated sampling.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut acc = 0.0;
        self.amplitudes
            .iter()
            .map(|a| {
                acc += a.norm_sqr();
                acc
            })
            .collect()
    }

    /// Convert measurement outcome to bitstring (qubit 0 leftmost).
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        outcome_to_bitstring(outcome, self.num_qubits)
    }
}

/// Draw one basis-state index from a cumulative distribution.
pub fn sample_cumulative<R: Rng + ?Sized>(cumulative: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.r#gen();
    let idx = cumulative.partition_point(|&c| c <= r);
    // Rounding can leave the last cumulative value just below r.
    idx.min(cumulative.len().saturating_sub(1))
}

/// Convert a basis-state index to a bitstring with qubit 0 leftmost.
pub fn outcome_to_bitstring(outcome: usize, num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|q| if outcome >> q & 1 == 1 { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaselock_ir::QubitId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        for amp in &sv.amplitudes[1..] {
            assert!(approx_eq(*amp, Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_echo_with_drift_matches_closed_form() {
        // H · Rz(ε) · H |0⟩ gives P(1) = sin²(ε/2).
        let eps = 0.3;
        let mut sv = Statevector::new(1);
        sv.apply(
            &Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            true,
        );
        sv.apply(
            &Instruction::noise_channel(NoiseModel::CoherentZ { angle: eps }, QubitId(0)),
            true,
        );
        sv.apply(
            &Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            true,
        );
        let p = sv.probabilities();
        assert!((p[1] - (eps / 2.0).sin().powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_noise_skipped_without_flag() {
        let mut sv = Statevector::new(1);
        sv.apply(
            &Instruction::noise_channel(NoiseModel::CoherentX { angle: 1.0 }, QubitId(0)),
            false,
        );
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_every_noise_channel_is_interpreted() {
        let theta = 0.8;
        for model in [
            NoiseModel::CoherentX { angle: theta },
            NoiseModel::CoherentZ { angle: theta },
        ] {
            let mut sv = Statevector::new(1);
            sv.apply_h(0);
            sv.apply(&Instruction::noise_channel(model, QubitId(0)), true);
            sv.apply_h(0);
            let p1 = sv.probabilities()[1];
            match model {
                // H·Rx·H is an Rz, invisible on |0⟩.
                NoiseModel::CoherentX { .. } => assert!(p1.abs() < 1e-12),
                NoiseModel::CoherentZ { .. } => {
                    assert!((p1 - (theta / 2.0).sin().powi(2)).abs() < 1e-12)
                }
            }
        }
    }

    #[test]
    fn test_rz_counter_rotation_cancels_drift() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);
        sv.apply_rz(0, 0.4);
        sv.apply_rz(0, -0.4);
        sv.apply_h(0);
        assert!((sv.probabilities()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_likely_and_bitstring() {
        let mut sv = Statevector::new(3);
        sv.apply_x(0);
        sv.apply_x(2);
        assert_eq!(sv.most_likely(), 0b101);
        assert_eq!(sv.outcome_to_bitstring(0b101), "101");
        assert_eq!(outcome_to_bitstring(0b001, 3), "100");
    }

    #[test]
    fn test_sample_deterministic_state() {
        let mut sv = Statevector::new(1);
        sv.apply_x(0);
        let cdf = sv.cumulative();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(sample_cumulative(&cdf, &mut rng), 1);
        }
    }
}
