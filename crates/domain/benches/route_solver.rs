//! Benchmarks for the route solver
//!
//! Measures exact search near its size limit and the heuristic on larger
//! instances built from real-looking coordinates around Xi'an.

#![allow(clippy::expect_used)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use domain::{Coordinate, DistanceMatrix, RouteSolver, SolverOptions, VisitPolicy};

/// Deterministic scatter of points around the city centre
fn city_points(n: usize) -> Vec<Coordinate> {
    let centre = Coordinate::xian_bell_tower();
    (0..n)
        .map(|i| {
            let step = i as f64;
            Coordinate::new_unchecked(
                centre.longitude() + (step * 0.731).sin() * 0.08,
                centre.latitude() + (step * 1.137).cos() * 0.06,
            )
        })
        .collect()
}

fn haversine_matrix(points: &[Coordinate]) -> DistanceMatrix {
    let rows = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| a.distance_meters(b).round() as u64)
                .collect()
        })
        .collect();
    DistanceMatrix::from_rows(rows).expect("square matrix")
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_solver_exact");
    group.measurement_time(Duration::from_secs(10));

    for n in [6usize, 10, 13] {
        let matrix = haversine_matrix(&city_points(n));
        let solver = RouteSolver::default();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &matrix, |b, m| {
            b.iter(|| {
                solver
                    .optimize(m, 0, VisitPolicy::ClosedLoop)
                    .expect("solvable")
            });
        });
    }

    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_solver_heuristic");
    group.measurement_time(Duration::from_secs(10));

    for n in [20usize, 40, 80] {
        let matrix = haversine_matrix(&city_points(n));
        let solver = RouteSolver::new(SolverOptions::heuristic_only());
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &matrix, |b, m| {
            b.iter(|| {
                solver
                    .optimize(m, 0, VisitPolicy::OpenPath)
                    .expect("solvable")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_exact, bench_heuristic);
criterion_main!(benches);
