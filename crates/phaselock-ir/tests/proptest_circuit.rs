//! Property-based tests for circuit validation and fingerprinting.

use phaselock_ir::{Circuit, Gate, NoiseModel, QubitId, StandardGate};
use proptest::prelude::*;

/// Operations used to build random circuits.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    X(u32),
    Rz(f64, u32),
    Drift(f64, u32),
    CX(u32, u32),
}

impl Op {
    fn apply(&self, circuit: &mut Circuit) {
        // Invalid operands (e.g. CX on one qubit) are rejected by the builder.
        let _ = match *self {
            Op::H(q) => circuit.h(QubitId(q)).map(|_| ()),
            Op::X(q) => circuit.x(QubitId(q)).map(|_| ()),
            Op::Rz(theta, q) => circuit.rz(theta, QubitId(q)).map(|_| ()),
            Op::Drift(angle, q) => circuit
                .noise(NoiseModel::CoherentZ { angle }, QubitId(q))
                .map(|_| ()),
            Op::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)).map(|_| ()),
        };
    }
}

fn arb_op(num_qubits: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..num_qubits).prop_map(Op::H),
        (0..num_qubits).prop_map(Op::X),
        (-1.0f64..1.0, 0..num_qubits).prop_map(|(t, q)| Op::Rz(t, q)),
        (-0.2f64..0.2, 0..num_qubits).prop_map(|(t, q)| Op::Drift(t, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(a, b)| Op::CX(a, b)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1u32..=4).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n, n);
            for op in &ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(circuit in arb_circuit()) {
        prop_assert_eq!(circuit.fingerprint(), circuit.clone().fingerprint());
    }

    #[test]
    fn labeled_insertions_preserve_fingerprint(
        circuit in arb_circuit(),
        angle in -0.3f64..0.3,
    ) {
        let mut corrected = circuit.clone();
        for q in 0..circuit.num_qubits() as u32 {
            corrected
                .gate(Gate::standard(StandardGate::Rz(angle)).with_label("stabilize"), [QubitId(q)])
                .unwrap();
        }
        prop_assert_eq!(
            circuit.fingerprint_excluding("stabilize"),
            corrected.fingerprint_excluding("stabilize")
        );
    }

    #[test]
    fn depth_never_exceeds_op_count(circuit in arb_circuit()) {
        prop_assert!(circuit.depth() <= circuit.num_ops());
    }
}
