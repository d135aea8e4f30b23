use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    /// Configuration (spec §7): the assembler was asked to solve a
    /// system with no active degrees of freedom at all.
    #[error("no active degrees of freedom: every node is either dry or Dirichlet")]
    NoActiveDof,

    /// Runtime invariant (spec §7): every node is a Dirichlet node, so
    /// the pattern-reused sparsity has no free rows left to factor.
    #[error("dimension mismatch building linear system: {what}")]
    DimensionMismatch { what: String },

    /// Numeric (spec §7): a direct factorization hit a (numerically)
    /// singular pivot — almost always a disconnected component with no
    /// inlet, which should have been caught topologically first.
    #[error("linear system is singular: {what}")]
    Singular { what: String },

    /// Numeric (spec §7): the iterative backend failed to reach the
    /// configured relative residual within the iteration budget.
    #[error("iterative solve did not converge: residual {residual:e} after {iterations} iterations")]
    NotConverged { residual: f64, iterations: usize },
}
