//! Per-element Darcy velocity recovery from the solved nodal pressure
//! field (spec §4.8 step 3): `v_e = -(1/mu) K_e grad(p_e)`, with
//! `grad(p_e)` the constant in-plane gradient from linear shape
//! functions.

use nalgebra::{Matrix3, Vector3};

use lizzy_core::Real;
use lizzy_mesh::Triangle;
use lizzy_solver::gradients::element_gradients;

pub fn element_velocity(
    tri: &Triangle,
    k_global: &Matrix3<Real>,
    viscosity: Real,
    p0: nalgebra::Point3<Real>,
    p1: nalgebra::Point3<Real>,
    p2: nalgebra::Point3<Real>,
    pa: Real,
    pb: Real,
    pc: Real,
) -> Vector3<Real> {
    let grads = element_gradients(tri, p0, p1, p2);
    let gx = grads[0].0 * pa + grads[1].0 * pb + grads[2].0 * pc;
    let gy = grads[0].1 * pa + grads[1].1 * pb + grads[2].1 * pc;
    let grad_p = gx * tri.tangent1 + gy * tri.tangent2;
    -(1.0 / viscosity) * (k_global * grad_p)
}
