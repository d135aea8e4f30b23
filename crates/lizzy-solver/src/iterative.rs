//! Iterative sparse backend: Jacobi-preconditioned conjugate gradient
//! over `sprs` CSR matrices (spec §4.6). The inner loop mirrors the
//! reservoir-simulation PCG routine this engine's sparse-solve style is
//! drawn from, generalized to the Dirichlet-eliminated SPD systems this
//! assembler produces.

use nalgebra::DVector;
use sprs::CsMat;

use lizzy_core::Real;

use crate::backend::{BackendKind, LinearBackend};
use crate::error::{SolverError, SolverResult};
use crate::pattern::AssembledSystem;

/// Relative residual tolerance (spec §4.6).
pub const TOLERANCE: Real = 1e-10;

fn mat_vec(a: &CsMat<Real>, x: &DVector<Real>) -> DVector<Real> {
    let n = a.rows();
    let mut y = DVector::zeros(n);
    for (row, vec) in a.outer_iterator().enumerate() {
        let mut sum = 0.0;
        for (&col, &val) in vec.indices().iter().zip(vec.data().iter()) {
            sum += val * x[col];
        }
        y[row] = sum;
    }
    y
}

fn jacobi_preconditioner(a: &CsMat<Real>) -> DVector<Real> {
    let n = a.rows();
    let mut diag = DVector::from_element(n, 1.0);
    for (row, vec) in a.outer_iterator().enumerate() {
        for (&col, &val) in vec.indices().iter().zip(vec.data().iter()) {
            if col == row && val.abs() > 1e-300 {
                diag[row] = 1.0 / val;
            }
        }
    }
    diag
}

struct PcgOutcome {
    x: DVector<Real>,
    converged: bool,
    iterations: usize,
    residual: Real,
}

fn solve_pcg(a: &CsMat<Real>, b: &DVector<Real>, m_inv: &DVector<Real>, max_iter: usize) -> PcgOutcome {
    let n = b.len();
    let mut x = DVector::zeros(n);
    let mut r = b - mat_vec(a, &x);
    let r0_norm = r.norm();
    if r0_norm == 0.0 {
        return PcgOutcome {
            x,
            converged: true,
            iterations: 0,
            residual: 0.0,
        };
    }

    let mut z = r.component_mul(m_inv);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);

    let mut converged = false;
    let mut iterations = 0;
    let mut residual = 1.0;
    for it in 0..max_iter {
        iterations = it + 1;
        residual = r.norm() / r0_norm;
        if residual < TOLERANCE {
            converged = true;
            iterations = it;
            break;
        }
        let q = mat_vec(a, &p);
        let p_dot_q = p.dot(&q);
        if p_dot_q.abs() < Real::EPSILON {
            break;
        }
        let alpha = r_dot_z / p_dot_q;
        x += alpha * &p;
        let r_new = &r - alpha * &q;
        let z_new = r_new.component_mul(m_inv);
        let r_new_dot_z_new = r_new.dot(&z_new);
        let beta = if r_dot_z.abs() < Real::EPSILON {
            0.0
        } else {
            r_new_dot_z_new / r_dot_z
        };
        p = &z_new + beta * &p;
        r = r_new;
        z = z_new;
        r_dot_z = r_new_dot_z_new;
    }

    PcgOutcome {
        x,
        converged,
        iterations,
        residual,
    }
}

#[derive(Debug, Default)]
pub struct IterativeBackend;

impl IterativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LinearBackend for IterativeBackend {
    fn solve(&mut self, system: &AssembledSystem<'_>) -> SolverResult<Vec<Real>> {
        let a = system.to_sprs();
        let b = DVector::from_column_slice(&system.b);
        let m_inv = jacobi_preconditioner(&a);
        let max_iter = 2 * system.pattern.dim();

        let outcome = solve_pcg(&a, &b, &m_inv, max_iter);
        if !outcome.converged {
            return Err(SolverError::NotConverged {
                residual: outcome.residual,
                iterations: outcome.iterations,
            });
        }
        Ok(outcome.x.as_slice().to_vec())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Iterative
    }
}
