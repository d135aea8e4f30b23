//! `LinearSolver`: the backend dispatcher the fill driver talks to. It
//! owns one primary [`LinearBackend`] chosen at `initialise_solver` and,
//! when that backend is iterative and fails to converge, falls back to
//! a direct sparse solve exactly once before surfacing a fatal error
//! (spec §4.8 failure semantics).

use lizzy_core::Real;

use crate::backend::{BackendKind, LinearBackend};
use crate::dense::DenseBackend;
use crate::error::{SolverError, SolverResult};
use crate::iterative::IterativeBackend;
use crate::pattern::AssembledSystem;
use crate::sparse_direct::SparseDirectBackend;

pub struct LinearSolver {
    primary: Box<dyn LinearBackend + Send>,
    fallback: Option<SparseDirectBackend>,
}

impl LinearSolver {
    pub fn new(kind: BackendKind) -> Self {
        let primary: Box<dyn LinearBackend + Send> = match kind {
            BackendKind::Dense => Box::new(DenseBackend::new()),
            BackendKind::SparseDirect => Box::new(SparseDirectBackend::new()),
            BackendKind::Iterative => Box::new(IterativeBackend::new()),
        };
        let fallback = (kind == BackendKind::Iterative).then(SparseDirectBackend::new);
        Self { primary, fallback }
    }

    pub fn kind(&self) -> BackendKind {
        self.primary.kind()
    }

    pub fn solve(&mut self, system: &AssembledSystem<'_>) -> SolverResult<Vec<Real>> {
        match self.primary.solve(system) {
            Ok(p) => Ok(p),
            Err(SolverError::NotConverged { residual, iterations }) => {
                let fallback = self
                    .fallback
                    .as_mut()
                    .expect("fallback is only absent for non-iterative primaries");
                tracing::warn!(
                    residual,
                    iterations,
                    "iterative solve did not converge, retrying with direct sparse backend"
                );
                fallback.solve(system)
            }
            Err(other) => Err(other),
        }
    }
}
