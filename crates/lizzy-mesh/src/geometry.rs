//! MeshGeometry (component #1): nodes, triangles, element normals, the
//! deterministic element-local in-plane frame, centroids and areas.
//!
//! Everything here is immutable once built; gradient and rosette
//! computations downstream rely on that.

use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

use lizzy_core::{ElementId, NodeId, Real};

use crate::error::{MeshError, MeshResult};
use crate::input::MeshInput;

/// Minimum area (m^2) below which a triangle is rejected as degenerate.
const MIN_ELEMENT_AREA: Real = 1e-15;

/// A triangular surface element with its precomputed plane geometry.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub id: ElementId,
    pub nodes: [NodeId; 3],
    /// Outward unit normal n-hat = normalize(e1 x e2).
    pub normal: Vector3<Real>,
    /// Deterministic in-plane orthonormal frame, used for gradients and
    /// as the fallback basis when no rosette direction is assigned.
    pub tangent1: Vector3<Real>,
    pub tangent2: Vector3<Real>,
    pub area: Real,
    pub centroid: Point3<Real>,
}

impl Triangle {
    /// Project a global-frame vector into this element's tangent plane
    /// and return its (t1, t2) in-plane components.
    pub fn project_in_plane(&self, v: &Vector3<Real>) -> (Real, Real) {
        (v.dot(&self.tangent1), v.dot(&self.tangent2))
    }
}

/// Immutable mesh geometry: nodes, triangles, and named sets.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    nodes: Vec<Point3<Real>>,
    triangles: Vec<Triangle>,
    node_sets: HashMap<String, Vec<NodeId>>,
    elem_sets: HashMap<String, Vec<ElementId>>,
}

impl MeshGeometry {
    /// Build mesh geometry from parsed input, precomputing per-triangle
    /// plane data. Fails on zero-area elements or out-of-range indices;
    /// `MeshInput.triangles` entries are implicitly triangular (3
    /// indices) by type, so "non-triangular" only arises if a future
    /// reader widens the contract — guarded here for that reason.
    pub fn build(input: &MeshInput) -> MeshResult<Self> {
        let nodes: Vec<Point3<Real>> = input
            .nodes
            .iter()
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();

        let mut triangles = Vec::with_capacity(input.triangles.len());
        for (idx, tri) in input.triangles.iter().enumerate() {
            for &n in tri {
                if n >= nodes.len() {
                    return Err(MeshError::NodeIndexOob {
                        element: idx,
                        node: n,
                    });
                }
            }
            let p0 = nodes[tri[0]];
            let p1 = nodes[tri[1]];
            let p2 = nodes[tri[2]];
            let e1 = p1 - p0;
            let e2 = p2 - p0;
            let cross = e1.cross(&e2);
            let twice_area = cross.norm();
            let area = 0.5 * twice_area;
            if area < MIN_ELEMENT_AREA {
                return Err(MeshError::ZeroAreaElement { element: idx });
            }
            let normal = cross / twice_area;
            let tangent1 = {
                let proj = e1 - e1.dot(&normal) * normal;
                proj.normalize()
            };
            let tangent2 = normal.cross(&tangent1);
            let centroid = Point3::from((p0.coords + p1.coords + p2.coords) / 3.0);

            triangles.push(Triangle {
                id: ElementId::from_index(idx as u32),
                nodes: [
                    NodeId::from_index(tri[0] as u32),
                    NodeId::from_index(tri[1] as u32),
                    NodeId::from_index(tri[2] as u32),
                ],
                normal,
                tangent1,
                tangent2,
                area,
                centroid,
            });
        }

        let mut node_sets = HashMap::new();
        for (name, idxs) in &input.node_sets {
            node_sets.insert(
                name.clone(),
                idxs.iter()
                    .map(|&i| NodeId::from_index(i as u32))
                    .collect(),
            );
        }

        let mut elem_sets = HashMap::new();
        for (name, idxs) in &input.elem_sets {
            elem_sets.insert(
                name.clone(),
                idxs.iter()
                    .map(|&i| ElementId::from_index(i as u32))
                    .collect(),
            );
        }

        tracing::debug!(
            nodes = nodes.len(),
            triangles = triangles.len(),
            "mesh geometry built"
        );

        Ok(Self {
            nodes,
            triangles,
            node_sets,
            elem_sets,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn position(&self, id: NodeId) -> Point3<Real> {
        self.nodes[id.idx()]
    }

    pub fn nodes(&self) -> &[Point3<Real>] {
        &self.nodes
    }

    pub fn triangle(&self, id: ElementId) -> &Triangle {
        &self.triangles[id.idx()]
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn node_set(&self, name: &str) -> MeshResult<&[NodeId]> {
        self.node_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownBoundary {
                name: name.to_string(),
            })
    }

    pub fn elem_set(&self, name: &str) -> MeshResult<&[ElementId]> {
        self.elem_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownDomain {
                name: name.to_string(),
            })
    }

    pub fn elem_set_names(&self) -> impl Iterator<Item = &String> {
        self.elem_sets.keys()
    }
}
