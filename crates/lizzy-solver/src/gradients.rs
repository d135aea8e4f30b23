//! Linear-triangle shape-function gradients and the in-plane
//! projection of an element's permeability tensor (spec §4.5). Shared
//! between stiffness assembly here and Darcy velocity recovery in the
//! fill driver, so both use the exact same element-local geometry.

use nalgebra::{Matrix2, Matrix3, Point3};

use lizzy_core::Real;
use lizzy_mesh::Triangle;

/// In-plane gradients `b_a = grad(N_a)` of the three linear shape
/// functions, each of magnitude `1 / (2 * area)`, in the element's
/// local `(tangent1, tangent2)` basis. `p0, p1, p2` are the global
/// positions of the element's three nodes, in `Triangle::nodes` order.
pub fn element_gradients(tri: &Triangle, p0: Point3<Real>, p1: Point3<Real>, p2: Point3<Real>) -> [(Real, Real); 3] {
    let pts = [
        (0.0, 0.0),
        tri.project_in_plane(&(p1 - p0)),
        tri.project_in_plane(&(p2 - p0)),
    ];
    let two_a = 2.0 * tri.area;

    std::array::from_fn(|a| {
        let b = (a + 1) % 3;
        let c = (a + 2) % 3;
        let (_, ya) = pts[b];
        let (_, yc) = pts[c];
        let (xb, _) = pts[b];
        let (xc, _) = pts[c];
        ((ya - yc) / two_a, (xc - xb) / two_a)
    })
}

/// Project a global-frame permeability tensor onto the element's
/// `(tangent1, tangent2)` plane, returning the 2x2 tangential tensor.
pub fn tangent_permeability(k_global: &Matrix3<Real>, tri: &Triangle) -> Matrix2<Real> {
    let e1 = tri.tangent1;
    let e2 = tri.tangent2;
    Matrix2::new(
        e1.dot(&(k_global * e1)),
        e1.dot(&(k_global * e2)),
        e2.dot(&(k_global * e1)),
        e2.dot(&(k_global * e2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizzy_mesh::{MeshGeometry, MeshInput};
    use nalgebra::Matrix3;

    fn unit_right_triangle() -> MeshGeometry {
        let input = MeshInput {
            nodes: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
            node_sets: Default::default(),
            elem_sets: Default::default(),
        };
        MeshGeometry::build(&input).unwrap()
    }

    #[test]
    fn gradients_sum_to_zero() {
        let mesh = unit_right_triangle();
        let tri = &mesh.triangles()[0];
        let p0 = mesh.position(tri.nodes[0]);
        let p1 = mesh.position(tri.nodes[1]);
        let p2 = mesh.position(tri.nodes[2]);
        let b = element_gradients(tri, p0, p1, p2);
        let sum_x: Real = b.iter().map(|g| g.0).sum();
        let sum_y: Real = b.iter().map(|g| g.1).sum();
        assert!(sum_x.abs() < 1e-12 && sum_y.abs() < 1e-12);
    }

    #[test]
    fn isotropic_tangent_permeability_is_scaled_identity() {
        let mesh = unit_right_triangle();
        let tri = &mesh.triangles()[0];
        let k = Matrix3::identity() * 3.0;
        let kt = tangent_permeability(&k, tri);
        assert!((kt[(0, 0)] - 3.0).abs() < 1e-12);
        assert!((kt[(1, 1)] - 3.0).abs() < 1e-12);
        assert!(kt[(0, 1)].abs() < 1e-12);
    }
}
