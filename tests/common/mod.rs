//! Shared helpers for the integration tests.
#![allow(dead_code)]

use sigma_method::prelude::*;

/// Deterministic xorshift generator for reproducible random matrices.
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_value(&mut self) -> u64 {
        let mut state = self.state;
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        self.state = state;
        state
    }
}

/// Generates a random sparse matrix whose diagonal is fully stored, so a
/// perfect matching is guaranteed to exist.
pub fn random_sigma(seed: u64, dimension: usize) -> SigmaMatrix {
    let mut rng = XorShift64::new(seed);
    let mut sigma = SigmaMatrix::new(dimension);
    for index in 0..dimension {
        sigma.insert(index, index, (rng.next_value() % 4) as i64);
    }
    for _ in 0..dimension * dimension / 3 {
        let row = (rng.next_value() as usize) % dimension;
        let column = (rng.next_value() as usize) % dimension;
        let value = (rng.next_value() % 5) as i64 - 1;
        sigma.insert(row, column, value);
    }
    sigma
}

/// Returns the total weight of `assignment` over the stored entries.
pub fn assignment_weight(sigma: &SigmaMatrix, assignment: &[usize]) -> i64 {
    assignment
        .iter()
        .enumerate()
        .map(|(row, &column)| sigma.get(row, column).expect("matched entries are stored"))
        .sum()
}
