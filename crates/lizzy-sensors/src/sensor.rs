//! A single point probe: resolved host element, cached barycentric
//! weights over that element's three nodes, and the last sampled
//! fields (spec §3, §4.7).

use nalgebra::{Point3, Vector3};

use lizzy_core::{ElementId, Real, SensorId};
use lizzy_mesh::{MeshGeometry, Triangle};

#[derive(Debug, Clone)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub position: Point3<Real>,
    pub host_element: ElementId,
    /// Barycentric weights over `host_element`'s three nodes, in the
    /// same order as `Triangle::nodes`.
    pub weights: [Real; 3],
    pub p: Real,
    pub v: Vector3<Real>,
    pub f: Real,
    /// Simulation time at the end of the step in which sampled fill
    /// first reached the wet threshold.
    pub triggered_at: Option<Real>,
}

impl Sensor {
    pub(crate) fn placeholder(id: SensorId, name: impl Into<String>, position: Point3<Real>) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            host_element: ElementId::from_index(0),
            weights: [0.0, 0.0, 0.0],
            p: 0.0,
            v: Vector3::zeros(),
            f: 0.0,
            triggered_at: None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered_at.is_some()
    }
}

/// Project `point` into the element's (tangent1, tangent2) plane,
/// using node 0 as the local origin, and return its barycentric
/// coordinates with respect to the element's three vertices.
///
/// Returns `None` if the element's plane-projected area is
/// degenerate (should not happen for a geometry-checked mesh).
pub(crate) fn barycentric_in_element(
    mesh: &MeshGeometry,
    tri: &Triangle,
    point: &Point3<Real>,
) -> Option<[Real; 3]> {
    let p0 = mesh.position(tri.nodes[0]);
    let p1 = mesh.position(tri.nodes[1]);
    let p2 = mesh.position(tri.nodes[2]);

    let to_2d = |p: &Point3<Real>| -> (Real, Real) { tri.project_in_plane(&(p - p0)) };
    let (x0, y0) = (0.0, 0.0);
    let (x1, y1) = to_2d(&p1);
    let (x2, y2) = to_2d(&p2);
    let (xp, yp) = to_2d(point);

    let denom = (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2);
    if denom.abs() < 1e-20 {
        return None;
    }
    let w0 = ((y1 - y2) * (xp - x2) + (x2 - x1) * (yp - y2)) / denom;
    let w1 = ((y2 - y0) * (xp - x2) + (x0 - x2) * (yp - y2)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some([w0, w1, w2])
}

/// Whether barycentric weights place the point inside the triangle
/// (with a small tolerance for points exactly on an edge).
pub(crate) fn is_contained(weights: &[Real; 3]) -> bool {
    const TOL: Real = 1e-9;
    weights.iter().all(|&w| w >= -TOL)
}
