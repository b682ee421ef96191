//! Submodule providing the compressible sub-component layer.
//!
//! A compressible sub-component is a repeated block of `p + 1` equations
//! over `p` private and `q` public variables whose internal assignment is
//! pre-solved once per exported public variable. In the compressed outer
//! problem the whole block is represented by a single surrogate row whose
//! entry under public variable `k` is the pre-solved weight of the block
//! when `k` is left to the outer system. After the outer assignment has
//! been solved, the analysis re-inflates each instance to full dimension.
use alloc::vec::Vec;

use log::debug;

use crate::{errors::AnalysisError, lap, sigma::SigmaMatrix, traits::SigmaValue};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A pre-solved sub-component, sealed after construction.
///
/// Column layout of the component matrix: columns `0..q` are the public
/// variables, columns `q..q + p` the private ones. Rows `0..=p` are the
/// component equations.
pub struct Compressible<V = i64> {
    /// The number of public (shared) variables.
    public_count: usize,
    /// The number of private (component-local) variables.
    private_count: usize,
    /// The component incidence matrix.
    sigma: SigmaMatrix<V>,
    /// Per-exported-public matchings: `matchings[k][i]` is the component
    /// column matched to equation `i` when public variable `k` is exported.
    matchings: Vec<Vec<usize>>,
    /// The weight of each per-exported-public matching.
    costs: Vec<V>,
}

impl<V: SigmaValue> Compressible<V> {
    /// Returns the number of public variables of the component.
    #[must_use]
    pub fn public_count(&self) -> usize {
        self.public_count
    }

    /// Returns the number of private variables of the component.
    #[must_use]
    pub fn private_count(&self) -> usize {
        self.private_count
    }

    /// Returns the pre-solved matching of the component equations for the
    /// provided exported public variable.
    ///
    /// # Panics
    ///
    /// Panics if `exported` is not a public variable of the component.
    #[must_use]
    pub fn matching(&self, exported: usize) -> &[usize] {
        &self.matchings[exported]
    }

    /// Returns the weight of the pre-solved matching for the provided
    /// exported public variable.
    ///
    /// # Panics
    ///
    /// Panics if `exported` is not a public variable of the component.
    #[must_use]
    pub fn cost(&self, exported: usize) -> V {
        self.costs[exported]
    }

    /// Returns the component incidence matrix.
    pub(crate) fn sigma(&self) -> &SigmaMatrix<V> {
        &self.sigma
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Builder accumulating the incidences of a compressible sub-component.
///
/// Sealing is by move: [`build`](CompressibleBuilder::build) consumes the
/// builder, so no incidence can change once the per-public matchings have
/// been computed.
pub struct CompressibleBuilder<V = i64> {
    /// The number of public variables.
    public_count: usize,
    /// The number of private variables.
    private_count: usize,
    /// The working incidence matrix of dimension `p + q`.
    sigma: SigmaMatrix<V>,
}

impl<V: SigmaValue> CompressibleBuilder<V> {
    /// Creates a builder for a component with the provided number of public
    /// and private variables, with every incidence absent.
    #[must_use]
    pub fn new(public_count: usize, private_count: usize) -> Self {
        Self {
            public_count,
            private_count,
            sigma: SigmaMatrix::new(public_count + private_count),
        }
    }

    /// Creates a builder seeded with the first `p + 1` rows of an existing
    /// matrix, which must follow the component column layout (public block
    /// first, private block second).
    ///
    /// # Panics
    ///
    /// Panics if a seeded entry references a column outside the component.
    #[must_use]
    pub fn from_rows(public_count: usize, private_count: usize, donor: &SigmaMatrix<V>) -> Self {
        let mut builder = Self::new(public_count, private_count);
        for (row, entries) in donor.rows().take(private_count + 1).enumerate() {
            for (column, value) in entries {
                builder.sigma.insert(row, column, value);
            }
        }
        builder
    }

    /// Sets the incidence of component equation `equation` on public
    /// variable `public`.
    ///
    /// # Panics
    ///
    /// Panics if `equation > p` or `public >= q`.
    pub fn set_public_incidence(&mut self, equation: usize, public: usize, value: V) {
        assert!(
            equation <= self.private_count,
            "The equation {equation} is out of range for a component with {} private variables.",
            self.private_count
        );
        assert!(
            public < self.public_count,
            "The public variable {public} is out of range for a component with {} public variables.",
            self.public_count
        );
        self.sigma.insert(equation, public, value);
    }

    /// Sets the incidence of component equation `equation` on private
    /// variable `private`.
    ///
    /// # Panics
    ///
    /// Panics if `equation > p` or `private >= p`.
    pub fn set_private_incidence(&mut self, equation: usize, private: usize, value: V) {
        assert!(
            equation <= self.private_count,
            "The equation {equation} is out of range for a component with {} private variables.",
            self.private_count
        );
        assert!(
            private < self.private_count,
            "The private variable {private} is out of range for a component with {} private variables.",
            self.private_count
        );
        self.sigma.insert(equation, self.public_count + private, value);
    }

    /// Seals the component: solves one assignment problem per public
    /// variable and records the matching and weight obtained when that
    /// variable is exported to the outer system.
    ///
    /// Exporting public `k` pins every other public column to a zero-weight
    /// identity row, which forces the `p + 1` component equations onto the
    /// private variables plus `k` itself. The identity rows contribute no
    /// weight, so the recorded cost is exactly the weight of the component
    /// equations.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SingularStructure`] if the component cannot
    /// export one of its public variables.
    pub fn build(self) -> Result<Compressible<V>, AnalysisError> {
        let Self { public_count, private_count, sigma } = self;
        let mut matchings = Vec::with_capacity(public_count);
        let mut costs = Vec::with_capacity(public_count);

        for exported in 0..public_count {
            let mut augmented = sigma.clone();
            let mut pinned_row = private_count + 1;
            for public in 0..public_count {
                if public == exported {
                    continue;
                }
                augmented.insert(pinned_row, public, V::zero());
                pinned_row += 1;
            }

            let solution = lap::solve_assignment(&augmented)?;
            matchings.push(solution.row_assignment[..=private_count].to_vec());
            costs.push(solution.cost);
        }

        debug!(
            "compressible sealed: {public_count} public, {private_count} private variables"
        );
        Ok(Compressible { public_count, private_count, sigma, matchings, costs })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Placement of a compressible component in a compressed outer problem.
pub struct CompressibleInstance<'component, V = i64> {
    /// Column of the outer matrix where the component's public block starts.
    pub public_offset: usize,
    /// Row of the outer matrix holding the component's surrogate equation.
    pub surrogate_row: usize,
    /// The pre-solved component this instance places.
    pub component: &'component Compressible<V>,
}

impl<'component, V: SigmaValue> CompressibleInstance<'component, V> {
    /// Creates a placement of `component` with its public block starting at
    /// column `public_offset` and its surrogate equation at row
    /// `surrogate_row`.
    #[must_use]
    pub fn new(
        public_offset: usize,
        surrogate_row: usize,
        component: &'component Compressible<V>,
    ) -> Self {
        Self { public_offset, surrogate_row, component }
    }

    /// Writes the surrogate row of this instance into the compressed outer
    /// matrix: the entry under public variable `k` is the pre-solved weight
    /// of the component when `k` is exported.
    ///
    /// # Panics
    ///
    /// Panics if the surrogate row or the public block exceeds the matrix
    /// dimension.
    pub fn insert_incidence(&self, sigma: &mut SigmaMatrix<V>) {
        for (public, &cost) in self.component.costs.iter().enumerate() {
            sigma.insert(self.surrogate_row, self.public_offset + public, cost);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An ordered collection of compressible instances applied to one outer
/// problem. Surrogate rows must be strictly increasing.
pub struct Compression<'component, V = i64> {
    /// The instances, ordered by strictly increasing surrogate row.
    pub instances: Vec<CompressibleInstance<'component, V>>,
}

impl<V> Default for Compression<'_, V> {
    fn default() -> Self {
        Self { instances: Vec::new() }
    }
}

impl<V: SigmaValue> Compression<'_, V> {
    /// Returns the total number of private variables over all instances,
    /// i.e. the number of columns added by inflation.
    #[must_use]
    pub fn variables(&self) -> usize {
        self.instances.iter().map(|instance| instance.component.private_count()).sum()
    }
}
