//! LinearAssembler (component #6): builds the sparse symmetric
//! stiffness `K` and right-hand side `b` for the pressure Poisson
//! problem, with Dirichlet rows for active inlets and for every node
//! that is not currently wet (spec §4.5).
//!
//! Free nodes are exactly the wet, non-inlet nodes: front nodes are
//! pinned to atmospheric (0 Pa) and dry nodes ahead of the front are
//! pinned the same way, since resin has not reached them and their
//! pressure is physically irrelevant. This keeps the active DOF set
//! and the structural nonzero pattern identical on every step, which
//! is what lets the sparsity pattern be captured once at init.

use nalgebra::Matrix3;

use lizzy_core::{ElementId, NodeId, Real};
use lizzy_materials::MaterialStore;
use lizzy_mesh::MeshGeometry;

use crate::error::{SolverError, SolverResult};
use crate::gradients::{element_gradients, tangent_permeability};
use crate::pattern::{AssembledSystem, SparsityPattern};

#[derive(Debug, Clone)]
struct ElementData {
    permeability: Matrix3<Real>,
    thickness: Real,
}

pub struct LinearAssembler {
    mesh: MeshGeometry,
    elements: Vec<ElementData>,
    viscosity: Real,
}

impl LinearAssembler {
    pub fn new(mesh: MeshGeometry, materials: &MaterialStore, viscosity: Real) -> Self {
        let elements = (0..mesh.element_count())
            .map(|i| {
                let id = ElementId::from_index(i as u32);
                ElementData {
                    permeability: materials.permeability(id),
                    thickness: materials.thickness(id),
                }
            })
            .collect();
        Self {
            mesh,
            elements,
            viscosity,
        }
    }

    /// Assemble `K` and `b` for the current fill state. `open_inlet_nodes`
    /// lists every node currently driven by an open inlet with its
    /// prescribed pressure; `fill` is the per-node fill factor.
    pub fn assemble<'p>(
        &self,
        pattern: &'p SparsityPattern,
        fill: &[Real],
        fill_tolerance: Real,
        open_inlet_nodes: &[(NodeId, Real)],
    ) -> SolverResult<AssembledSystem<'p>> {
        let dim = pattern.dim();
        if fill.len() != dim {
            return Err(SolverError::DimensionMismatch {
                what: format!("fill vector has {} entries, expected {dim}", fill.len()),
            });
        }

        let mut values = vec![0.0; pattern.nnz()];
        let b = vec![0.0; dim];

        for tri in self.mesh.triangles() {
            let data = &self.elements[tri.id.idx()];
            let p0 = self.mesh.position(tri.nodes[0]);
            let p1 = self.mesh.position(tri.nodes[1]);
            let p2 = self.mesh.position(tri.nodes[2]);
            let grads = element_gradients(tri, p0, p1, p2);
            let k_tan = tangent_permeability(&data.permeability, tri);
            let scale = data.thickness * tri.area / self.viscosity;

            for a in 0..3 {
                let (gax, gay) = grads[a];
                for c in 0..3 {
                    let (gcx, gcy) = grads[c];
                    let kac = scale
                        * (gax * (k_tan[(0, 0)] * gcx + k_tan[(0, 1)] * gcy)
                            + gay * (k_tan[(1, 0)] * gcx + k_tan[(1, 1)] * gcy));
                    let row = tri.nodes[a].idx();
                    let col = tri.nodes[c].idx();
                    let pos = pattern.index_of(row, col).expect(
                        "mesh-edge adjacency must contain every element's local node pairs",
                    );
                    values[pos] += kac;
                }
            }
        }

        let mut system = AssembledSystem { pattern, values, b };

        // Dirichlet-0 on every non-wet node (front or dry-ahead).
        for i in 0..dim {
            if fill[i] < 1.0 - fill_tolerance {
                apply_dirichlet(&mut system, pattern, i, 0.0);
            }
        }
        // Open inlets override with the prescribed inlet pressure.
        for &(node, p) in open_inlet_nodes {
            apply_dirichlet(&mut system, pattern, node.idx(), p);
        }

        if open_inlet_nodes.is_empty() && (0..dim).all(|i| fill[i] < 1.0 - fill_tolerance) {
            return Err(SolverError::NoActiveDof);
        }

        Ok(system)
    }
}

/// Replace row/column `i` with an identity row (preserving symmetry)
/// and prescribe `p_i`, the standard Dirichlet elimination (spec
/// §4.5).
fn apply_dirichlet(system: &mut AssembledSystem<'_>, pattern: &SparsityPattern, i: usize, value: Real) {
    let row_start = pattern.row_ptr()[i];
    let row_end = pattern.row_ptr()[i + 1];
    for pos in row_start..row_end {
        let j = pattern.col_idx()[pos];
        if j == i {
            continue;
        }
        let k_ij = system.values[pos];
        if k_ij != 0.0 {
            system.b[j] -= k_ij * value;
        }
        system.values[pos] = 0.0;
        if let Some(mirror) = pattern.index_of(j, i) {
            system.values[mirror] = 0.0;
        }
    }
    let diag = pattern.index_of(i, i).expect("diagonal always present");
    system.values[diag] = 1.0;
    system.b[i] = value;
}
