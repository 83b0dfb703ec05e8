//! High-level circuit builder API.

use std::collections::BTreeMap;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::noise::NoiseModel;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in program order. Every instruction is validated on
/// insertion, so a `Circuit` never references a qubit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary (possibly labeled) gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Insert a coherent noise channel on a qubit.
    pub fn noise(&mut self, model: NoiseModel, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::noise_channel(model, qubit))
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure all qubits into matching classical bits, adding bits as needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }
        for i in 0..self.num_qubits {
            self.push(Instruction::measure(QubitId(i), ClbitId(i)))?;
        }
        Ok(self)
    }

    /// Add a barrier across all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.push(Instruction::barrier(qubits))
    }

    /// Validate and append an instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.name();

        let expected = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if let Some(angle) = gate.kind.angle() {
                    check_angle(gate_name, angle)?;
                }
                Some(gate.num_qubits())
            }
            InstructionKind::NoiseChannel(model) => {
                check_angle(gate_name, model.angle())?;
                Some(1)
            }
            InstructionKind::Measure => {
                let got = instruction.clbits.len() as u32;
                if instruction.qubits.len() as u32 != got || got == 0 {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate_name.into(),
                        expected: got.max(1),
                        got: instruction.qubits.len() as u32,
                    });
                }
                None
            }
            InstructionKind::Barrier => None,
        };

        if let Some(expected) = expected {
            let got = instruction.qubits.len() as u32;
            if got != expected {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate_name.into(),
                    expected,
                    got,
                });
            }
        }

        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(gate_name.into()),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.into()),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: Some(gate_name.into()),
                });
            }
        }

        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Total number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Check whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Operation counts keyed by instruction name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Circuit depth: the longest chain of instructions sharing a qubit.
    ///
    /// Barriers align their qubits without adding a layer.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let current = inst
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0);
            let next = if inst.is_barrier() { current } else { current + 1 };
            for q in &inst.qubits {
                levels[q.index()] = next;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Structural fingerprint of the circuit, ignoring gates labeled `label`.
    ///
    /// Two circuits that differ only by inserted labeled gates share a
    /// fingerprint. Angles are hashed by bit pattern, so the value is exact
    /// and stable across runs.
    pub fn fingerprint_excluding(&self, label: &str) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u32(self.num_qubits);
        hasher.write_u32(self.num_clbits);
        for inst in self.instructions.iter().filter(|i| !i.has_label(label)) {
            hasher.write(inst.name().as_bytes());
            for q in &inst.qubits {
                hasher.write_u32(q.0);
            }
            for c in &inst.clbits {
                hasher.write_u32(c.0);
            }
            let angle = match &inst.kind {
                InstructionKind::Gate(gate) => gate.kind.angle(),
                InstructionKind::NoiseChannel(model) => Some(model.angle()),
                _ => None,
            };
            if let Some(angle) = angle {
                hasher.write_u64(angle.to_bits());
            }
        }
        hasher.finish()
    }

    /// Structural fingerprint over every instruction.
    pub fn fingerprint(&self) -> u64 {
        // No instruction carries an empty label.
        self.fingerprint_excluding("")
    }
}

fn check_angle(gate_name: &str, angle: f64) -> IrResult<()> {
    if angle.is_finite() {
        Ok(())
    } else {
        Err(IrError::NonFiniteAngle {
            gate_name: gate_name.into(),
            angle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_layer_depth() {
        let mut circuit = Circuit::with_size("echo", 2, 0);
        for q in 0..2 {
            circuit
                .h(QubitId(q))
                .unwrap()
                .noise(NoiseModel::CoherentZ { angle: 0.1 }, QubitId(q))
                .unwrap()
                .h(QubitId(q))
                .unwrap();
        }
        assert_eq!(circuit.depth(), 3);

        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 4);
        assert_eq!(circuit.num_ops(), 7);
    }

    #[test]
    fn test_barrier_aligns_without_layer() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.x(QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("m", 3, 0);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.has_measurements());
        assert_eq!(circuit.count_ops().get("measure"), Some(&3));
    }

    #[test]
    fn test_rejects_unknown_qubit() {
        let mut circuit = Circuit::with_size("bad", 1, 0);
        let err = circuit.h(QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { .. }));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_rejects_duplicate_qubit() {
        let mut circuit = Circuit::with_size("bad", 2, 0);
        let err = circuit.cx(QubitId(0), QubitId(0)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let mut circuit = Circuit::with_size("bad", 2, 0);
        let err = circuit
            .gate(StandardGate::CX, [QubitId(0)])
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_finite_angle() {
        let mut circuit = Circuit::with_size("bad", 1, 0);
        assert!(matches!(
            circuit.rz(f64::NAN, QubitId(0)).unwrap_err(),
            IrError::NonFiniteAngle { .. }
        ));
        assert!(matches!(
            circuit
                .noise(NoiseModel::CoherentZ { angle: f64::INFINITY }, QubitId(0))
                .unwrap_err(),
            IrError::NonFiniteAngle { .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_clbit() {
        let mut circuit = Circuit::with_size("bad", 1, 0);
        let err = circuit.measure(QubitId(0), ClbitId(0)).unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }

    #[test]
    fn test_fingerprint_ignores_labeled_gates() {
        let mut base = Circuit::with_size("fp", 1, 0);
        base.h(QubitId(0)).unwrap();

        let mut corrected = base.clone();
        corrected
            .gate(
                Gate::standard(StandardGate::Rz(-0.2)).with_label("stabilize"),
                [QubitId(0)],
            )
            .unwrap();

        assert_eq!(
            base.fingerprint_excluding("stabilize"),
            corrected.fingerprint_excluding("stabilize")
        );
        assert_ne!(base.fingerprint(), corrected.fingerprint());
    }

    #[test]
    fn test_fingerprint_sensitive_to_angle() {
        let mut a = Circuit::with_size("a", 1, 0);
        a.noise(NoiseModel::CoherentZ { angle: 0.1 }, QubitId(0)).unwrap();
        let mut b = Circuit::with_size("a", 1, 0);
        b.noise(NoiseModel::CoherentZ { angle: 0.1000001 }, QubitId(0))
            .unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
