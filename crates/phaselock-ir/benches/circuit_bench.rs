//! Benchmarks for Phaselock circuit operations
//!
//! Run with: cargo bench -p phaselock-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use phaselock_ir::{Circuit, NoiseModel, QubitId};

fn echo_circuit(num_qubits: u32, depth: u32) -> Circuit {
    let mut circuit = Circuit::with_size("bench", num_qubits, num_qubits);
    for _ in 0..depth {
        for q in 0..num_qubits {
            circuit.h(QubitId(q)).unwrap();
            circuit
                .noise(NoiseModel::CoherentZ { angle: 0.05 }, QubitId(q))
                .unwrap();
            circuit.h(QubitId(q)).unwrap();
        }
    }
    circuit.measure_all().unwrap();
    circuit
}

/// Benchmark building echo circuits of growing width
fn bench_echo_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("echo_build");

    for num_qubits in &[1u32, 3, 5, 10] {
        group.bench_with_input(
            BenchmarkId::new("depth_5", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| echo_circuit(black_box(n), black_box(5)));
            },
        );
    }

    group.finish();
}

/// Benchmark depth and fingerprint queries
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_queries");
    let circuit = echo_circuit(5, 20);

    group.bench_function("depth", |b| {
        b.iter(|| black_box(&circuit).depth());
    });

    group.bench_function("fingerprint", |b| {
        b.iter(|| black_box(&circuit).fingerprint_excluding("stabilize"));
    });

    group.finish();
}

criterion_group!(benches, bench_echo_build, bench_queries);
criterion_main!(benches);
