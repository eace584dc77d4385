//! Benchmarks for the cleaner pipeline.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use navclean::algo::group::group_triangles;
use navclean::algo::triangles::IndexedTriangles;
use navclean::algo::weld::{WeldTable, DEFAULT_WELD_TOLERANCE};
use navclean::prelude::*;

/// `islands` separate `n x n` grids, every triangle with its own corners.
fn create_unwelded_grids(n: usize, islands: usize) -> Triangulation {
    let mut vertices = Vec::with_capacity(islands * n * n * 6);
    let mut indices = Vec::with_capacity(islands * n * n * 6);

    for island in 0..islands {
        let x0 = island as f64 * (n as f64 + 2.0);
        for j in 0..n {
            for i in 0..n {
                let (x, z) = (x0 + i as f64, j as f64);
                let v00 = Point3::new(x, 0.0, z);
                let v10 = Point3::new(x + 1.0, 0.0, z);
                let v01 = Point3::new(x, 0.0, z + 1.0);
                let v11 = Point3::new(x + 1.0, 0.0, z + 1.0);

                for corner in [v00, v01, v11, v00, v11, v10] {
                    indices.push(vertices.len() as u32);
                    vertices.push(corner);
                }
            }
        }
    }

    Triangulation::new(vertices, indices).unwrap()
}

fn bench_stages(c: &mut Criterion) {
    let triangulation = create_unwelded_grids(64, 4);

    c.bench_function("weld_4x64x64", |b| {
        b.iter(|| WeldTable::build(triangulation.vertices(), DEFAULT_WELD_TOLERANCE))
    });

    let weld = WeldTable::build(triangulation.vertices(), DEFAULT_WELD_TOLERANCE);
    let triangles = IndexedTriangles::new(&triangulation, &weld);
    c.bench_function("group_4x64x64", |b| b.iter(|| group_triangles(&triangles)));
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    for n in [16, 64] {
        let triangulation = create_unwelded_grids(n, 4);
        // Walkable point on the first island only.
        let walkable = [Point3::new(0.3, 0.0, 0.6)];

        group.bench_with_input(BenchmarkId::new("block", n), &triangulation, |b, t| {
            let options = CleanOptions::default();
            b.iter(|| clean(t, &walkable, &options).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("bake", n), &triangulation, |b, t| {
            let options = CleanOptions::default().with_mode(Mode::BakeWalkable);
            b.iter(|| clean(t, &walkable, &options).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_clean);
criterion_main!(benches);
