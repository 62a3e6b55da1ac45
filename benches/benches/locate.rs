// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gridloc_index::{BuildConfig, HierarchicalIndex, SpatialIndex};
use gridloc_mesh::{BoxArray, Geometry, IndexBox, IntVect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: i32) -> i32 {
        (self.next_u64() % n as u64) as i32
    }
}

/// `n^3` cubes of side `size` tiling `[0, n*size)^3`.
fn tiled_cubes(n: i32, size: i32) -> BoxArray<3> {
    BoxArray::from_boxes((0..n).flat_map(move |i| {
        (0..n).flat_map(move |j| {
            (0..n).map(move |k| {
                IndexBox::from_half_open(
                    IntVect::new([i * size, j * size, k * size]),
                    IntVect::new([(i + 1) * size, (j + 1) * size, (k + 1) * size]),
                )
            })
        })
    }))
}

/// Boxes of mixed sizes scattered over `[0, extent)^3`; overlaps are allowed.
fn scattered_cubes(count: usize, extent: i32, max_size: i32) -> BoxArray<3> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    BoxArray::from_boxes((0..count).map(|_| {
        let size = 1 + rng.below(max_size);
        let lo = [
            rng.below(extent - size),
            rng.below(extent - size),
            rng.below(extent - size),
        ];
        IndexBox::from_half_open(IntVect::new(lo), IntVect::new(lo.map(|x| x + size)))
    }))
}

fn unit_geometry(extent: i32) -> Geometry<3> {
    Geometry::new(
        IndexBox::from_half_open(IntVect::zero(), IntVect::splat(extent)),
        [0.0; 3],
        [1.0; 3],
    )
}

fn random_points(count: usize, extent: f64, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            [
                rng.next_f64() * extent,
                rng.next_f64() * extent,
                rng.next_f64() * extent,
            ]
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[8_i32, 16, 32] {
        let boxes = tiled_cubes(n, 16);
        let geom = unit_geometry(n * 16);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        for (label, config) in [
            ("sequential", BuildConfig::SEQUENTIAL),
            ("parallel", BuildConfig { parallel_threshold: 0 }),
        ] {
            group.bench_with_input(BenchmarkId::new(label, n * n * n), &boxes, |b, boxes| {
                let mut index = SpatialIndex::with_config(config);
                b.iter(|| {
                    index.build(boxes, &geom);
                    black_box(index.permutation().len());
                });
            });
        }
    }
    let boxes = scattered_cubes(20_000, 512, 24);
    let geom = unit_geometry(512);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("scattered_20k", |b| {
        let mut index = SpatialIndex::new();
        b.iter(|| {
            index.build(&boxes, &geom);
            black_box(index.counts().len());
        });
    });
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    let points = random_points(100_000, 512.0, 0xBADC_F00D_1234_5678);
    group.throughput(Throughput::Elements(points.len() as u64));

    let tiled = tiled_cubes(32, 16);
    let scattered = scattered_cubes(20_000, 512, 24);
    let geom = unit_geometry(512);
    for (label, boxes) in [("tiled", &tiled), ("scattered", &scattered)] {
        let index = SpatialIndex::from_boxes(boxes, &geom);
        let q = index.query();
        group.bench_function(format!("{label}_single"), |b| {
            b.iter(|| {
                let hits = points.iter().filter(|p| q.locate(*p).is_some()).count();
                black_box(hits);
            });
        });
        group.bench_function(format!("{label}_assign_all"), |b| {
            b.iter(|| black_box(q.assign_all(&points)));
        });
    }
    group.finish();
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy");
    // Three levels at refinement ratio 2; each finer level covers the lower octant of the one below.
    let mut box_arrays = Vec::new();
    let mut geoms = Vec::new();
    for lev in 0..3 {
        let ratio = 1 << lev;
        box_arrays.push(tiled_cubes(16, 16));
        geoms.push(Geometry::new(
            IndexBox::from_half_open(IntVect::zero(), IntVect::splat(256 * ratio)),
            [0.0; 3],
            [1.0 / f64::from(ratio); 3],
        ));
    }
    let points = random_points(100_000, 256.0, 0x1234_5678_9ABC_DEF0);
    group.throughput(Throughput::Elements(points.len() as u64));

    group.bench_function("build_3_levels", |b| {
        let mut index = HierarchicalIndex::new();
        b.iter(|| {
            index.build(&box_arrays, &geoms).unwrap();
            black_box(index.num_levels());
        });
    });

    let mut index = HierarchicalIndex::new();
    index.build(&box_arrays, &geoms).unwrap();
    group.bench_function("group_by_grid", |b| {
        let q = index.query();
        b.iter(|| black_box(q.group_by_grid(&points).num_grids()));
    });
    group.bench_function("is_valid", |b| {
        b.iter(|| black_box(index.is_valid(&box_arrays)));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_locate, bench_hierarchy);
criterion_main!(benches);
