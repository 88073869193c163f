//! Benchmarks for qtutor circuit construction
//!
//! Run with: cargo bench -p qtutor-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qtutor_ir::{CircuitBuilder, ClbitId, QubitId, draw};

/// Oracle-shaped circuit: superpose, CX every input onto a shared target, measure.
fn shared_target_circuit(n: u32) -> qtutor_ir::Circuit {
    let mut builder = CircuitBuilder::with_size("bench", n + 1, n);
    builder.x(QubitId(n)).unwrap();
    builder.h_each((0..=n).map(QubitId)).unwrap();
    builder.barrier_all().unwrap();
    for i in 0..n {
        builder.cx(QubitId(i), QubitId(n)).unwrap();
    }
    builder.barrier_all().unwrap();
    builder.h_each((0..n).map(QubitId)).unwrap();
    builder
        .measure_range((0..n).map(QubitId), (0..n).map(ClbitId))
        .unwrap();
    builder.build()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for n in &[4u32, 16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("shared_target", n), n, |b, &n| {
            b.iter(|| shared_target_circuit(black_box(n)));
        });
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let circuit = shared_target_circuit(64);

    group.bench_function("depth", |b| b.iter(|| black_box(&circuit).depth()));
    group.bench_function("draw", |b| b.iter(|| draw(black_box(&circuit))));

    group.finish();
}

criterion_group!(benches, bench_construction, bench_analysis);
criterion_main!(benches);
