//! Criterion benchmark for the assignment solver and the full analysis on
//! random sparse structural-index matrices of varying sizes and densities.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sigma_method::prelude::*;

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_value(&mut self) -> u64 {
        let mut state = self.state;
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        self.state = state;
        state
    }
}

/// Generates a random sparse matrix of the given dimension and density.
///
/// The diagonal is fully stored so that a perfect matching exists.
fn random_sigma(seed: u64, dimension: usize, density: f64) -> SigmaMatrix {
    let mut rng = XorShift64::new(seed);
    let mut sigma = SigmaMatrix::new(dimension);
    for index in 0..dimension {
        sigma.insert(index, index, (rng.next_value() % 3) as i64);
    }

    let target_entries = ((dimension * dimension) as f64 * density) as usize;
    for _ in 0..target_entries {
        let row = (rng.next_value() as usize) % dimension;
        let column = (rng.next_value() as usize) % dimension;
        let value = (rng.next_value() % 4) as i64;
        sigma.insert(row, column, value);
    }
    sigma
}

fn bench_assignment(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("assignment");
    for dimension in [32usize, 128, 512] {
        for density in [0.02f64, 0.10] {
            let sigma = random_sigma(0x5eed, dimension, density);
            group.bench_with_input(
                BenchmarkId::new(format!("n{dimension}"), density),
                &sigma,
                |bencher, sigma| {
                    bencher.iter(|| {
                        solve_assignment(black_box(sigma)).expect("feasible by construction")
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_analysis(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("pryce");
    for dimension in [32usize, 128] {
        let mut problem: InputProblem = InputProblem::new(dimension);
        problem.sigma = random_sigma(0xfeed, dimension, 0.05);
        group.bench_with_input(
            BenchmarkId::from_parameter(dimension),
            &problem,
            |bencher, problem| {
                bencher.iter(|| {
                    problem.pryce_algorithm().expect("feasible by construction")
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_assignment, bench_analysis);
criterion_main!(benches);
