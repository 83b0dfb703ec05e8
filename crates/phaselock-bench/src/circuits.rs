//! Randomized echo circuits and correction insertion.
//!
//! Every layer of an echo circuit applies `H · CoherentZ(ε) · H` to each
//! qubit. Without drift the pair of Hadamards cancels; a drift `ε` leaks
//! `sin²(ε/2)` of the population into the flipped state. Layers may also
//! entangle a random ordered pair with a CX, and a final random X mask picks
//! the ideal outcome.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use phaselock_ir::{
    Circuit, Gate, Instruction, InstructionKind, IrResult, NoiseModel, QubitId, StandardGate,
};

/// Label carried by every inserted correction gate.
pub const STABILIZE_LABEL: &str = "stabilize";

/// Where corrections go in the stabilized circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// After every noise channel on the corrected qubit. The full angle is
    /// repeated per layer, so a qubit accumulates `depth · angle` in total.
    #[default]
    Interleaved,
    /// Once per corrected qubit, after the last instruction. A Z rotation
    /// just before a Z-basis measurement leaves outcome probabilities unchanged.
    Terminal,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Interleaved => write!(f, "interleaved"),
            Placement::Terminal => write!(f, "terminal"),
        }
    }
}

impl std::str::FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interleaved" => Ok(Placement::Interleaved),
            "terminal" => Ok(Placement::Terminal),
            other => Err(format!(
                "unknown placement '{other}' (expected 'interleaved' or 'terminal')"
            )),
        }
    }
}

/// Generate an unmeasured randomized echo circuit.
pub fn generate_echo_circuit(
    num_qubits: u32,
    depth: usize,
    coherent_noise: f64,
    seed: u64,
) -> IrResult<Circuit> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut circuit = Circuit::with_size(format!("echo_{num_qubits}x{depth}"), num_qubits, 0);

    for _ in 0..depth {
        for q in 0..num_qubits {
            let qubit = QubitId(q);
            let angle = rng.gen_range(-coherent_noise..=coherent_noise);
            circuit
                .h(qubit)?
                .noise(NoiseModel::CoherentZ { angle }, qubit)?
                .h(qubit)?;
        }

        if num_qubits >= 2 && rng.gen_bool(0.5) {
            let control = rng.gen_range(0..num_qubits);
            let mut target = rng.gen_range(0..num_qubits - 1);
            if target >= control {
                target += 1;
            }
            circuit.cx(QubitId(control), QubitId(target))?;
        }
    }

    for q in 0..num_qubits {
        if rng.gen_bool(0.5) {
            circuit.x(QubitId(q))?;
        }
    }

    Ok(circuit)
}

/// Copy `base` with a labeled `Rz(-angle_q)` inserted for each qubit
/// `q < min(num_qubits, angles.len())`.
///
/// Qubits beyond the available angles are left uncorrected.
pub fn insert_corrections(
    base: &Circuit,
    angles: &[f64],
    placement: Placement,
) -> IrResult<Circuit> {
    let corrected = base.num_qubits().min(angles.len());
    let correction = |q: usize| {
        Instruction::gate(
            Gate::standard(StandardGate::Rz(-angles[q])).with_label(STABILIZE_LABEL),
            [QubitId(q as u32)],
        )
    };

    let mut circuit = Circuit::with_size(
        format!("{}_stabilized", base.name()),
        base.num_qubits() as u32,
        base.num_clbits() as u32,
    );

    for inst in base.instructions() {
        circuit.push(inst.clone())?;
        if placement == Placement::Interleaved
            && matches!(inst.kind, InstructionKind::NoiseChannel(_))
        {
            let q = inst.qubits[0].index();
            if q < corrected {
                circuit.push(correction(q))?;
            }
        }
    }

    if placement == Placement::Terminal {
        for q in 0..corrected {
            circuit.push(correction(q))?;
        }
    }

    Ok(circuit)
}
