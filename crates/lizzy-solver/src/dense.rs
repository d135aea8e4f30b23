//! Dense direct backend: the correctness reference (spec §4.6). Builds
//! a full `DMatrix` every step and factors it with `nalgebra`'s
//! Cholesky. Only sensible for small meshes; exists to cross-check the
//! sparse backends on the regression fixtures (spec §8).

use nalgebra::{Cholesky, DVector};

use lizzy_core::Real;

use crate::backend::{BackendKind, LinearBackend};
use crate::error::{SolverError, SolverResult};
use crate::pattern::AssembledSystem;

#[derive(Debug, Default)]
pub struct DenseBackend;

impl DenseBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LinearBackend for DenseBackend {
    fn solve(&mut self, system: &AssembledSystem<'_>) -> SolverResult<Vec<Real>> {
        let k = system.dense();
        let b = DVector::from_column_slice(&system.b);
        let chol = Cholesky::new(k).ok_or_else(|| SolverError::Singular {
            what: "dense Cholesky factorization failed (matrix not SPD)".to_string(),
        })?;
        Ok(chol.solve(&b).as_slice().to_vec())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Dense
    }
}
