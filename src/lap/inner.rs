//! Submodule providing the augmenting-path engine of the assignment solver.
use alloc::vec::Vec;

use bitvec::vec::BitVec;

use super::{AssignmentState, Solution};
use crate::{errors::AnalysisError, sigma::SigmaMatrix, traits::SigmaValue};

/// Support struct for computing the maximum-weight assignment.
///
/// The engine minimises the negated weights: on stored entries the reduced
/// cost `-sigma(i, j) - row_potential[i] - column_potential[j]` is kept
/// nonnegative, and zero on matched pairs. Absent entries have no reduced
/// cost at all and are therefore unreachable for augmenting paths.
pub(super) struct Inner<'matrix, V> {
    /// The matrix to compute the assignment on.
    matrix: &'matrix SigmaMatrix<V>,
    /// Row potentials of the minimisation problem.
    row_potentials: Vec<V>,
    /// Column potentials of the minimisation problem.
    column_potentials: Vec<V>,
    /// Column assigned to each row, indexed by row.
    assigned_columns: Vec<AssignmentState<usize>>,
    /// Row assigned to each column, indexed by column.
    assigned_rows: Vec<AssignmentState<usize>>,
}

impl<'matrix, V: SigmaValue> Inner<'matrix, V> {
    pub(super) fn new(matrix: &'matrix SigmaMatrix<V>) -> Self {
        let dimension = matrix.dimension();
        Self {
            matrix,
            row_potentials: vec![V::zero(); dimension],
            column_potentials: vec![V::zero(); dimension],
            assigned_columns: vec![AssignmentState::Unassigned; dimension],
            assigned_rows: vec![AssignmentState::Unassigned; dimension],
        }
    }

    /// Initialises the column potentials to the column minima of the negated
    /// weights and greedily assigns each column minimum to its row where
    /// possible. Rows are scanned in ascending order with a strict
    /// comparison, so the smallest row wins a tied minimum.
    pub(super) fn column_reduction(&mut self) {
        debug_assert!(
            self.assigned_columns.iter().all(AssignmentState::is_unassigned),
            "We expected all rows to be unassigned before the column reduction",
        );

        let dimension = self.matrix.dimension();
        let mut column_minima: Vec<Option<(V, usize)>> = vec![None; dimension];
        for (row, entries) in self.matrix.rows().enumerate() {
            for (column, value) in entries {
                let negated = -value;
                if column_minima[column].is_none_or(|(minimum, _)| negated < minimum) {
                    column_minima[column] = Some((negated, row));
                }
            }
        }

        for (column, minimum) in column_minima.into_iter().enumerate() {
            // An empty column keeps a zero potential; its infeasibility
            // surfaces during augmentation.
            let Some((negated, row)) = minimum else { continue };
            self.column_potentials[column] = negated;
            if self.assigned_columns[row].is_unassigned() {
                self.assigned_columns[row] = AssignmentState::Assigned(column);
                self.assigned_rows[column] = AssignmentState::Assigned(row);
            }
        }
    }

    /// Completes the partial assignment left by the column reduction with
    /// one shortest augmenting path per remaining unassigned row.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SingularStructure`] if some row cannot reach
    /// any unassigned column over stored entries.
    pub(super) fn augmentation(&mut self) -> Result<(), AnalysisError> {
        let dimension = self.matrix.dimension();
        let unassigned_rows: Vec<usize> = self
            .assigned_columns
            .iter()
            .enumerate()
            .filter_map(|(row, state)| state.is_unassigned().then_some(row))
            .collect();
        if unassigned_rows.is_empty() {
            return Ok(());
        }

        let mut shortest_distances = vec![V::max_value(); dimension];
        let mut predecessors = vec![0usize; dimension];
        for start_row in unassigned_rows {
            let sink =
                self.find_augmenting_path(start_row, &mut shortest_distances, &mut predecessors)?;
            self.augmentation_backtrack(sink, &predecessors, start_row);
        }
        Ok(())
    }

    /// Runs a Dijkstra search over the reduced costs from `start_row` until
    /// an unassigned column is reached, then updates the potentials so that
    /// all edges on shortest paths become tight.
    ///
    /// Returns the unassigned sink column; `predecessors` holds the
    /// augmenting path leading to it.
    fn find_augmenting_path(
        &mut self,
        start_row: usize,
        shortest_distances: &mut [V],
        predecessors: &mut [usize],
    ) -> Result<usize, AnalysisError> {
        let dimension = self.matrix.dimension();
        let infinity = V::max_value();
        shortest_distances.fill(infinity);
        let mut scanned_rows: BitVec = BitVec::repeat(false, dimension);
        let mut scanned_columns: BitVec = BitVec::repeat(false, dimension);
        let mut minimum_distance = V::zero();
        let mut row = start_row;

        let sink = loop {
            scanned_rows.set(row, true);
            let row_potential = self.row_potentials[row];
            for (column, value) in self.matrix.row(row) {
                if scanned_columns[column] {
                    continue;
                }
                let distance =
                    minimum_distance + (-value) - row_potential - self.column_potentials[column];
                if distance < shortest_distances[column] {
                    shortest_distances[column] = distance;
                    predecessors[column] = row;
                }
            }

            // The closest reachable unscanned column; ascending scan with a
            // strict comparison, so the smallest column wins ties.
            let mut next: Option<(V, usize)> = None;
            for column in 0..dimension {
                if scanned_columns[column] {
                    continue;
                }
                let distance = shortest_distances[column];
                if distance == infinity {
                    continue;
                }
                if next.is_none_or(|(best, _)| distance < best) {
                    next = Some((distance, column));
                }
            }
            let Some((distance, column)) = next else {
                return Err(AnalysisError::SingularStructure);
            };

            minimum_distance = distance;
            scanned_columns.set(column, true);
            match self.assigned_rows[column] {
                AssignmentState::Unassigned => break column,
                AssignmentState::Assigned(assigned_row) => row = assigned_row,
            }
        };

        self.row_potentials[start_row] += minimum_distance;
        for scanned_row in scanned_rows.iter_ones() {
            if scanned_row == start_row {
                continue;
            }
            let AssignmentState::Assigned(matched_column) = self.assigned_columns[scanned_row]
            else {
                unreachable!("We expected every scanned row except the start row to be assigned");
            };
            self.row_potentials[scanned_row] +=
                minimum_distance - shortest_distances[matched_column];
        }
        for scanned_column in scanned_columns.iter_ones() {
            self.column_potentials[scanned_column] -=
                minimum_distance - shortest_distances[scanned_column];
        }

        Ok(sink)
    }

    /// Backtracks along the predecessor chain to flip the matching on the
    /// augmenting path that ends in `column`.
    fn augmentation_backtrack(
        &mut self,
        mut column: usize,
        predecessors: &[usize],
        start_row: usize,
    ) {
        let mut number_of_steps = 0usize;
        loop {
            number_of_steps += 1;
            assert!(
                number_of_steps <= self.assigned_rows.len(),
                "The augmentation backtrack detected a predecessor cycle"
            );

            let row = predecessors[column];
            self.assigned_rows[column] = AssignmentState::Assigned(row);
            let previous = core::mem::replace(
                &mut self.assigned_columns[row],
                AssignmentState::Assigned(column),
            );

            // Root of the augmenting path: this row was unassigned when the
            // search started, so it has no previous column to follow.
            if row == start_row {
                break;
            }

            let AssignmentState::Assigned(previous_column) = previous else {
                unreachable!("We expected every intermediate row of the path to be assigned");
            };
            column = previous_column;
        }
    }
}

impl<V: SigmaValue> From<Inner<'_, V>> for Solution<V> {
    fn from(inner: Inner<'_, V>) -> Self {
        let dimension = inner.matrix.dimension();
        let mut row_assignment = Vec::with_capacity(dimension);
        let mut col_assignment = vec![0usize; dimension];
        let mut cost = V::zero();
        for (row, state) in inner.assigned_columns.iter().enumerate() {
            let AssignmentState::Assigned(column) = *state else {
                unreachable!("We expected every row to be assigned after the augmentation");
            };
            row_assignment.push(column);
            col_assignment[column] = row;
            cost += inner.matrix.get(row, column).unwrap_or_else(|| {
                unreachable!("We expected the matched entry ({row}, {column}) to be stored")
            });
        }

        let u = inner.row_potentials.into_iter().map(|potential| -potential).collect();
        Solution { row_assignment, col_assignment, u, v: inner.column_potentials, cost }
    }
}
