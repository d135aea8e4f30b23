//! Per-domain fiber orientation data that rotates a material's principal
//! permeabilities into the global frame, element by element (spec §3,
//! §4.3). The source data accepts either a direction vector or a pair
//! of points defining one; both normalize to the same `u1`.

use nalgebra::{Matrix3, Vector3};

use lizzy_core::Real;
use lizzy_mesh::Triangle;

use crate::error::{MaterialError, MaterialResult};

/// Reference direction for a rosette, in whichever form the caller
/// supplied it.
#[derive(Debug, Clone, Copy)]
pub enum Rosette {
    Direction(Vector3<Real>),
    TwoPoint(nalgebra::Point3<Real>, nalgebra::Point3<Real>),
}

impl Default for Rosette {
    /// Global-X reference direction, the conventional default warp
    /// direction when no orientation data is supplied.
    fn default() -> Self {
        Rosette::Direction(Vector3::x())
    }
}

impl Rosette {
    fn u1(&self) -> Vector3<Real> {
        match self {
            Rosette::Direction(v) => v.normalize(),
            Rosette::TwoPoint(p, q) => (q - p).normalize(),
        }
    }

    /// Build the per-element orthonormal basis (e1, e2, e3) with
    /// e1 = normalize(project(u1, element plane)), e3 = element normal,
    /// e2 = e3 x e1. Fails if u1 is parallel to the element normal.
    fn element_frame(
        &self,
        element: &Triangle,
    ) -> MaterialResult<(Vector3<Real>, Vector3<Real>, Vector3<Real>)> {
        let e3 = element.normal;
        let u1 = self.u1();
        let proj = u1 - u1.dot(&e3) * e3;
        let proj_norm = proj.norm();
        if proj_norm < 1e-9 {
            return Err(MaterialError::RosetteParallelToNormal {
                element: element.id.idx(),
            });
        }
        let e1 = proj / proj_norm;
        let e2 = e3.cross(&e1);
        Ok((e1, e2, e3))
    }

    /// K_e = R diag(k1, k2, k3) R^T, R = [e1 e2 e3].
    pub fn permeability_tensor(
        &self,
        element: &Triangle,
        k1: Real,
        k2: Real,
        k3: Real,
    ) -> MaterialResult<Matrix3<Real>> {
        let (e1, e2, e3) = self.element_frame(element)?;
        let r = Matrix3::from_columns(&[e1, e2, e3]);
        let d = Matrix3::from_diagonal(&Vector3::new(k1, k2, k3));
        Ok(r * d * r.transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizzy_core::ElementId;
    use nalgebra::Point3;

    fn flat_triangle() -> Triangle {
        Triangle {
            id: ElementId::from_index(0),
            nodes: [
                ElementId::from_index(0),
                ElementId::from_index(1),
                ElementId::from_index(2),
            ],
            normal: Vector3::z(),
            tangent1: Vector3::x(),
            tangent2: Vector3::y(),
            area: 0.5,
            centroid: Point3::new(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn isotropic_material_independent_of_rosette() {
        let tri = flat_triangle();
        let k = 1e-10;
        let r1 = Rosette::Direction(Vector3::x());
        let r2 = Rosette::Direction(Vector3::new(1.0, 1.0, 0.0));
        let k1 = r1.permeability_tensor(&tri, k, k, k).unwrap();
        let k2 = r2.permeability_tensor(&tri, k, k, k).unwrap();
        assert!((k1 - k2).norm() < 1e-18);
        // Should reduce to k * I in-plane plus k along normal.
        assert!((k1[(0, 0)] - k).abs() < 1e-20);
        assert!((k1[(1, 1)] - k).abs() < 1e-20);
    }

    #[test]
    fn parallel_direction_rejected() {
        let tri = flat_triangle();
        let rosette = Rosette::Direction(Vector3::z());
        assert!(matches!(
            rosette.permeability_tensor(&tri, 1.0, 1.0, 1.0),
            Err(MaterialError::RosetteParallelToNormal { element: 0 })
        ));
    }

    #[test]
    fn two_point_matches_equivalent_direction() {
        let tri = flat_triangle();
        let p = Point3::new(0.0, 0.0, 0.0);
        let q = Point3::new(2.0, 0.0, 0.0);
        let by_points = Rosette::TwoPoint(p, q);
        let by_dir = Rosette::Direction(Vector3::x());
        let k1 = by_points.permeability_tensor(&tri, 1e-10, 1e-11, 1e-11).unwrap();
        let k2 = by_dir.permeability_tensor(&tri, 1e-10, 1e-11, 1e-11).unwrap();
        assert!((k1 - k2).norm() < 1e-22);
    }
}
