//! LinearSolver (component #7): the three interchangeable backends
//! behind one trait, selected once at `initialise_solver` (spec §4.6).

use lizzy_core::Real;

use crate::error::SolverResult;
use crate::pattern::AssembledSystem;

/// Which concrete backend to build at `initialise_solver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Dense,
    SparseDirect,
    Iterative,
}

/// A pressure solve backend: given an assembled system, return `p`.
/// Implementors own whatever factorization/preconditioner state they
/// need across steps (the sparsity pattern is fixed, so a direct
/// backend may choose to symbolically factor once and refactor
/// numerically every step).
pub trait LinearBackend {
    fn solve(&mut self, system: &AssembledSystem<'_>) -> SolverResult<Vec<Real>>;

    fn kind(&self) -> BackendKind;
}
