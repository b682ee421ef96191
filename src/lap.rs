//! Submodule providing the linear assignment solver for sigma matrices.
mod inner;

use alloc::vec::Vec;

use inner::Inner;
use log::debug;

use crate::{errors::AnalysisError, sigma::SigmaMatrix, traits::SigmaValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The state of a single row or column in a partial assignment.
pub enum AssignmentState<T> {
    /// The row or column is not assigned yet.
    Unassigned,
    /// The row or column is assigned to the contained counterpart.
    Assigned(T),
}

impl<T> AssignmentState<T> {
    /// Returns true if the assignment is unassigned.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, AssignmentState::Unassigned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Solution of the linear assignment problem over a sigma matrix: a
/// maximum-weight perfect matching together with dual potentials.
pub struct Solution<V = i64> {
    /// Column matched to each row.
    pub row_assignment: Vec<usize>,
    /// Row matched to each column; the inverse of `row_assignment`.
    pub col_assignment: Vec<usize>,
    /// Row potentials: `u[i] - v[j] >= sigma(i, j)` holds on every stored
    /// entry, with equality on matched pairs.
    pub u: Vec<V>,
    /// Column potentials.
    pub v: Vec<V>,
    /// Total weight of the matching.
    pub cost: V,
}

/// Computes a maximum-weight perfect matching of the provided sigma matrix,
/// in the Jonker-Volgenant style: a column reduction phase followed by
/// successive shortest augmenting paths over the reduced costs.
///
/// Absent entries are never relaxed, so the matching can only use stored
/// entries. Ties are broken deterministically: the smallest row wins a
/// column minimum and the smallest column wins a path distance.
///
/// # Errors
///
/// Returns [`AnalysisError::SingularStructure`] if the matrix admits no
/// perfect matching over its stored entries.
pub fn solve_assignment<V: SigmaValue>(
    sigma: &SigmaMatrix<V>,
) -> Result<Solution<V>, AnalysisError> {
    let mut inner = Inner::new(sigma);
    inner.column_reduction();
    inner.augmentation()?;
    let solution: Solution<V> = inner.into();
    debug!(
        "assignment solved: dimension {}, total weight {}",
        sigma.dimension(),
        solution.cost
    );
    Ok(solution)
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_state_predicates() {
        let unassigned: AssignmentState<usize> = AssignmentState::Unassigned;
        assert!(unassigned.is_unassigned());
        assert!(!AssignmentState::Assigned(3usize).is_unassigned());
    }

    #[test]
    fn test_empty_matrix_yields_empty_solution() {
        let sigma: SigmaMatrix = SigmaMatrix::new(0);
        let solution = solve_assignment(&sigma).expect("The empty matrix is trivially matched");
        assert!(solution.row_assignment.is_empty());
        assert!(solution.col_assignment.is_empty());
        assert_eq!(solution.cost, 0);
    }

    #[test]
    fn test_single_entry() {
        let mut sigma: SigmaMatrix = SigmaMatrix::new(1);
        sigma.insert(0, 0, 4);
        let solution = solve_assignment(&sigma).expect("A single stored entry is a matching");
        assert_eq!(solution.row_assignment, vec![0]);
        assert_eq!(solution.cost, 4);
    }

    #[test]
    fn test_missing_entry_is_singular() {
        let sigma: SigmaMatrix = SigmaMatrix::new(1);
        assert_eq!(solve_assignment(&sigma), Err(AnalysisError::SingularStructure));
    }
}
