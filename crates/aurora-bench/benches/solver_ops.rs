//! Kernel benchmarks: the 1-D remap and the moment integrator.

use aurora_core::{CellId, MomentSlot};
use aurora_solver::moments;
use aurora_solver::remap::{map_1d, RemapGeometry};
use aurora_test_utils::{maxwellian_cell, perturbed_maxwellian_cell, standard_grid};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn bench_remap(c: &mut Criterion) {
    let grid = standard_grid();
    let mut group = c.benchmark_group("remap");

    group.bench_function("identity", |b| {
        b.iter_batched(
            || maxwellian_cell(CellId(0), &grid, 1.0, 0.8),
            |mut cell| map_1d(&mut cell, &grid, &RemapGeometry::identity(), 2, usize::MAX),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("translation", |b| {
        b.iter_batched(
            || perturbed_maxwellian_cell(CellId(0), &grid, 1.0, 0.8, 7),
            |mut cell| {
                map_1d(
                    &mut cell,
                    &grid,
                    &RemapGeometry::translation(0.7),
                    2,
                    usize::MAX,
                )
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_moments(c: &mut Criterion) {
    let grid = standard_grid();
    let mut group = c.benchmark_group("moments");

    group.bench_function("integrate", |b| {
        b.iter_batched(
            || maxwellian_cell(CellId(0), &grid, 1.0, 0.8),
            |mut cell| moments::integrate_cell(&mut cell, &grid, MomentSlot::Raw),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_remap, bench_moments);
criterion_main!(benches);
