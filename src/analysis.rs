//! Submodule providing the Pryce structural-analysis driver.
use alloc::vec::Vec;

use bitvec::vec::BitVec;
use log::{debug, trace};

use crate::{
    compression::Compression,
    errors::AnalysisError,
    lap::{self, Solution},
    sigma::SigmaMatrix,
    traits::SigmaValue,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Placement of rows and columns in an inflated analysis result.
pub struct InflatedMap {
    /// Reserved for non-component equations; not populated by the analysis.
    pub rows: Vec<usize>,
    /// Reserved for non-component variables; not populated by the analysis.
    pub cols: Vec<usize>,
    /// First inflated row of each component, in instance order.
    pub component_rows: Vec<usize>,
    /// First inflated column of each component's private block, in instance
    /// order.
    pub component_cols: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a structural analysis: the highest-value transversal and the
/// canonical offsets, at the full (inflated) problem dimension.
pub struct AnalysisResult<V = i64> {
    /// Column (variable) matched to each row (equation).
    pub row_assignment: Vec<usize>,
    /// Row matched to each column; the inverse of `row_assignment`.
    pub col_assignment: Vec<usize>,
    /// Equation offsets: equation `i` must be differentiated `c[i]` times.
    pub c: Vec<V>,
    /// Variable offsets: variable `j` occurs differentiated up to `d[j]`
    /// times.
    pub d: Vec<V>,
    /// Placement of component rows and columns in the inflated problem.
    pub inflated: InflatedMap,
}

impl<V: SigmaValue> AnalysisResult<V> {
    /// Returns the inflated row index of equation `equation` of the
    /// `component`-th compressible instance.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not an inflated component index.
    #[must_use]
    pub fn extracted_equation(&self, equation: usize, component: usize) -> usize {
        self.inflated.component_rows[component] + equation
    }

    /// Returns the inflated column index of private variable `variable` of
    /// the `component`-th compressible instance.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not an inflated component index.
    #[must_use]
    pub fn extracted_variable(&self, variable: usize, component: usize) -> usize {
        self.inflated.component_cols[component] + variable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A structural-analysis input: the problem dimension together with its
/// structural-index matrix.
pub struct InputProblem<V = i64> {
    /// The number of equations and variables.
    pub dimension: usize,
    /// The structural-index matrix.
    pub sigma: SigmaMatrix<V>,
}

impl<V: SigmaValue> InputProblem<V> {
    /// Creates a problem of the provided dimension with an empty matrix.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension, sigma: SigmaMatrix::new(dimension) }
    }

    /// Runs the Pryce sigma-method on the problem: solves the linear
    /// assignment problem over the matrix and derives the canonical offsets
    /// from the resulting transversal.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SingularStructure`] if the matrix admits no
    /// perfect matching.
    pub fn pryce_algorithm(&self) -> Result<AnalysisResult<V>, AnalysisError> {
        debug_assert_eq!(
            self.dimension,
            self.sigma.dimension(),
            "We expected the declared dimension to match the matrix dimension",
        );

        let solution = lap::solve_assignment(&self.sigma)?;
        let mut c = vec![V::zero(); self.dimension];
        let mut d = vec![V::zero(); self.dimension];
        solve_by_fixed_point(&solution.row_assignment, &self.sigma, &mut c, &mut d);

        Ok(AnalysisResult {
            row_assignment: solution.row_assignment,
            col_assignment: solution.col_assignment,
            c,
            d,
            inflated: InflatedMap::default(),
        })
    }

    /// Runs the Pryce sigma-method on a compressed problem whose matrix
    /// already contains one surrogate row per compressible instance.
    ///
    /// The compressed assignment is solved at the compressed dimension,
    /// then expanded: surrogate rows are replaced by the internal rows of
    /// their components, private variables are appended as fresh columns,
    /// and the pre-solved component matchings are projected into the
    /// inflated assignment before the offsets are derived.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SingularStructure`] if the compressed
    /// matrix admits no perfect matching.
    pub fn pryce_compressed(
        &self,
        compression: &Compression<'_, V>,
    ) -> Result<AnalysisResult<V>, AnalysisError> {
        debug_assert_eq!(
            self.dimension,
            self.sigma.dimension(),
            "We expected the declared dimension to match the matrix dimension",
        );
        debug_assert!(
            compression
                .instances
                .windows(2)
                .all(|pair| pair[0].surrogate_row < pair[1].surrogate_row),
            "We expected the surrogate rows of the compression to be strictly increasing",
        );

        let compressed_solution = lap::solve_assignment(&self.sigma)?;
        let inflated_dimension = self.dimension + compression.variables();
        let mut result = AnalysisResult {
            row_assignment: vec![0usize; inflated_dimension],
            col_assignment: vec![0usize; inflated_dimension],
            c: vec![V::zero(); inflated_dimension],
            d: vec![V::zero(); inflated_dimension],
            inflated: InflatedMap::default(),
        };

        let mut inflated =
            copy_defragmented(&self.sigma, &compressed_solution, &mut result, compression);
        inflate_instances(&mut inflated, &compressed_solution, &mut result, compression);
        debug!(
            "compressed assignment inflated from dimension {} to {}",
            self.dimension, inflated_dimension
        );

        solve_by_fixed_point(&result.row_assignment, &inflated, &mut result.c, &mut result.d);
        Ok(result)
    }
}

/// Derives the canonical offsets from a transversal by the monotone fixed
/// point: every stored entry `(i, j)` raises `d[j]` to at least
/// `c[i] + sigma(i, j)`, and every row resets `c[i]` to
/// `d[j] - sigma(i, j)` on its matched column `j`, until no `c[i]` changes.
///
/// Starting from zero the pair `(c, d)` grows monotonically and converges
/// to the component-wise minimal nonnegative offsets.
///
/// # Panics
///
/// Panics if the fixed point fails to stabilise within `dimension^2 + 1`
/// sweeps, which can only happen when `assignment` is not a highest-value
/// transversal of `sigma`.
pub fn solve_by_fixed_point<V: SigmaValue>(
    assignment: &[usize],
    sigma: &SigmaMatrix<V>,
    c: &mut [V],
    d: &mut [V],
) {
    let dimension = sigma.dimension();
    debug_assert_eq!(assignment.len(), dimension);
    debug_assert_eq!(c.len(), dimension);
    debug_assert_eq!(d.len(), dimension);

    let mut sweeps = 0usize;
    loop {
        sweeps += 1;
        assert!(
            sweeps <= dimension * dimension + 1,
            "The offset fixed point did not converge within {} sweeps; the assignment is not a highest-value transversal",
            dimension * dimension + 1
        );

        for (equation, entries) in sigma.rows().enumerate() {
            for (variable, order) in entries {
                let lower_bound = c[equation] + order;
                if lower_bound > d[variable] {
                    d[variable] = lower_bound;
                }
            }
        }

        let mut converged = true;
        for (equation, &variable) in assignment.iter().enumerate() {
            let order = sigma.get(equation, variable).unwrap_or_else(|| {
                unreachable!(
                    "We expected the matched entry ({equation}, {variable}) to be stored"
                )
            });
            let offset = d[variable] - order;
            if c[equation] != offset {
                c[equation] = offset;
                converged = false;
            }
        }

        if converged {
            break;
        }
        trace!("offset fixed point sweep {sweeps} has not converged yet");
    }
}

/// Copies every non-surrogate row of the compressed matrix, and its matched
/// column, into a fresh matrix of the inflated dimension, shifting row
/// indices down by the number of surrogate rows already passed.
fn copy_defragmented<V: SigmaValue>(
    compressed: &SigmaMatrix<V>,
    solution: &Solution<V>,
    result: &mut AnalysisResult<V>,
    compression: &Compression<'_, V>,
) -> SigmaMatrix<V> {
    let mut inflated = SigmaMatrix::new(result.row_assignment.len());
    let mut surrogate_rows: BitVec = BitVec::repeat(false, compressed.dimension());
    for instance in &compression.instances {
        surrogate_rows.set(instance.surrogate_row, true);
    }

    let mut surrogates_passed = 0usize;
    for (row, entries) in compressed.rows().enumerate() {
        if surrogate_rows[row] {
            surrogates_passed += 1;
            continue;
        }
        let target_row = row - surrogates_passed;
        for (column, value) in entries {
            inflated.insert(target_row, column, value);
        }
        let column = solution.row_assignment[row];
        result.row_assignment[target_row] = column;
        result.col_assignment[column] = target_row;
    }

    inflated
}

/// Materialises the internal rows, private columns and pre-solved matching
/// of every compressible instance into the inflated matrix and assignment,
/// recording the component placements in the result's [`InflatedMap`].
fn inflate_instances<V: SigmaValue>(
    inflated: &mut SigmaMatrix<V>,
    solution: &Solution<V>,
    result: &mut AnalysisResult<V>,
    compression: &Compression<'_, V>,
) {
    let mut row_offset = solution.row_assignment.len() - compression.instances.len();
    let mut col_offset = solution.col_assignment.len();

    for instance in &compression.instances {
        let component = instance.component;
        let public_count = component.public_count();
        let private_count = component.private_count();

        // The public variable this surrogate row solves.
        let matched_column = solution.row_assignment[instance.surrogate_row];
        debug_assert!(
            matched_column >= instance.public_offset
                && matched_column - instance.public_offset < public_count,
            "We expected the surrogate row {} to be matched inside its public block",
            instance.surrogate_row,
        );
        let exported = matched_column - instance.public_offset;
        let matching = component.matching(exported);

        for (row, entries) in component.sigma().rows().take(private_count + 1).enumerate() {
            let target_row = row_offset + row;
            for (column, value) in entries {
                let target_column = if column >= public_count {
                    col_offset + column - public_count
                } else {
                    instance.public_offset + column
                };
                inflated.insert(target_row, target_column, value);
            }

            let matched = matching[row];
            debug_assert!(
                matched >= public_count || matched == exported,
                "We expected the component matching to use only private variables and the exported public",
            );
            let target_column = if matched >= public_count {
                col_offset + matched - public_count
            } else {
                instance.public_offset + matched
            };
            result.row_assignment[target_row] = target_column;
            result.col_assignment[target_column] = target_row;
        }

        result.inflated.component_rows.push(row_offset);
        result.inflated.component_cols.push(col_offset);
        row_offset += private_count + 1;
        col_offset += private_count;
    }
}
