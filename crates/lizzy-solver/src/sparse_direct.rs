//! Sparse direct backend: `faer`'s sparse Cholesky factorization. The
//! default when the iterative backend is unavailable or disabled
//! (spec §4.6); also used as the one-shot fallback when the iterative
//! backend fails to converge (spec §4.8 failure semantics).

use faer::sparse::linalg::solvers::Llt;
use faer::sparse::{SparseColMat, Triplet};
use faer::Side;

use lizzy_core::Real;

use crate::backend::{BackendKind, LinearBackend};
use crate::error::{SolverError, SolverResult};
use crate::pattern::AssembledSystem;

#[derive(Debug, Default)]
pub struct SparseDirectBackend;

impl SparseDirectBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LinearBackend for SparseDirectBackend {
    fn solve(&mut self, system: &AssembledSystem<'_>) -> SolverResult<Vec<Real>> {
        let dim = system.pattern.dim();
        let mut triplets = Vec::with_capacity(system.pattern.nnz());
        for row in 0..dim {
            for pos in system.pattern.row_ptr()[row]..system.pattern.row_ptr()[row + 1] {
                let col = system.pattern.col_idx()[pos];
                if col <= row {
                    triplets.push(Triplet::new(row, col, system.values[pos]));
                }
            }
        }

        let mat = SparseColMat::try_new_from_triplets(dim, dim, &triplets).map_err(|e| {
            SolverError::Singular {
                what: format!("failed to assemble sparse matrix for factorization: {e}"),
            }
        })?;

        let llt = Llt::try_new(&mat, Side::Lower).map_err(|_| SolverError::Singular {
            what: "sparse Cholesky factorization failed (matrix not SPD)".to_string(),
        })?;

        let rhs = faer::Mat::<Real>::from_fn(dim, 1, |i, _| system.b[i]);
        let x = llt.solve(&rhs);
        Ok((0..dim).map(|i| x[(i, 0)]).collect())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::SparseDirect
    }
}
