//! Integration tests for the sparse structural-index matrix.
#![cfg(feature = "std")]

use sigma_method::prelude::*;

mod common;
use common::random_sigma;

#[test]
fn test_round_trip_of_inserted_entries() {
    let sigma = random_sigma(7, 9);
    for index in 0..9 {
        assert!(sigma.get(index, index).is_some(), "the diagonal is always stored");
    }

    let mut observed = 0usize;
    for (row, entries) in sigma.rows().enumerate() {
        let mut previous_column = None;
        for (column, value) in entries {
            assert_eq!(sigma.get(row, column), Some(value));
            assert!(previous_column < Some(column), "row iteration is strictly ascending");
            previous_column = Some(column);
            observed += 1;
        }
    }
    assert_eq!(observed, sigma.number_of_defined_values());
}

#[test]
fn test_clone_and_equality() {
    let sigma = random_sigma(11, 6);
    let mut other = sigma.clone();
    assert_eq!(sigma, other);

    other.insert(0, 0, 99);
    assert_ne!(sigma, other);
}

#[test]
fn test_debug_render() {
    let mut sigma: SigmaMatrix = SigmaMatrix::new(2);
    sigma.insert(0, 1, 3);
    let rendered = format!("{sigma:?}");
    assert!(rendered.contains("SigmaMatrix"));
    assert!(rendered.contains("dimension"));
}
