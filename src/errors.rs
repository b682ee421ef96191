//! Submodule providing the errors enumeration for the structural analysis.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
/// Errors that can occur while analysing a structural-index matrix.
pub enum AnalysisError {
    /// The sigma matrix admits no perfect matching of equations to
    /// variables: the system is structurally singular.
    #[error("The sigma matrix is structurally singular: no perfect matching of equations to variables exists.")]
    SingularStructure,
}
