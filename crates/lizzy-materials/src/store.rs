//! MaterialStore (component #3): named porous materials, domain
//! assignment, and the resulting per-element permeability tensor in the
//! global coordinate frame.

use std::collections::{HashMap, HashSet};

use nalgebra::Matrix3;

use lizzy_core::units::{Permeability, Ratio};
use lizzy_core::{ElementId, Real};
use lizzy_mesh::MeshGeometry;

use crate::error::{MaterialError, MaterialResult};
use crate::material::PorousMaterial;
use crate::rosette::Rosette;

/// Per-element material data, resolved once every domain is assigned.
#[derive(Debug, Clone)]
pub struct ElementAssignment {
    pub material: String,
    pub permeability: Matrix3<Real>,
    pub thickness: Real,
    pub porosity: Real,
}

#[derive(Debug, Default)]
pub struct MaterialStore {
    materials: HashMap<String, PorousMaterial>,
    assigned_domains: HashSet<String>,
    elements: Vec<Option<ElementAssignment>>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_material(
        &mut self,
        name: impl Into<String>,
        permeability: (Permeability, Permeability, Permeability),
        porosity: Ratio,
        thickness: Real,
    ) -> MaterialResult<()> {
        let name = name.into();
        if self.materials.contains_key(&name) {
            return Err(MaterialError::DuplicateMaterial { name });
        }
        let material = PorousMaterial::new(name.clone(), permeability, porosity, thickness)?;
        tracing::debug!(material = %name, "material created");
        self.materials.insert(name, material);
        Ok(())
    }

    /// Assign a material (and optional rosette) to every element tagged
    /// with `domain_name`. Fails if the domain is already assigned, the
    /// domain or material is unknown, or a rosette direction is
    /// parallel to some assigned element's normal.
    pub fn assign_material(
        &mut self,
        material_name: &str,
        domain_name: &str,
        mesh: &MeshGeometry,
        rosette: Option<Rosette>,
    ) -> MaterialResult<()> {
        let material = self
            .materials
            .get(material_name)
            .ok_or_else(|| MaterialError::UnknownMaterial {
                name: material_name.to_string(),
            })?
            .clone();

        if self.assigned_domains.contains(domain_name) {
            return Err(MaterialError::DomainAlreadyAssigned {
                name: domain_name.to_string(),
            });
        }

        let elements = mesh
            .elem_set(domain_name)
            .map_err(|_| MaterialError::UnknownDomain {
                name: domain_name.to_string(),
            })?
            .to_vec();

        if self.elements.len() < mesh.element_count() {
            self.elements.resize(mesh.element_count(), None);
        }

        let rosette = rosette.unwrap_or_default();
        for &elem_id in &elements {
            let tri = mesh.triangle(elem_id);
            let permeability =
                rosette.permeability_tensor(tri, material.k1.value, material.k2.value, material.k3.value)?;
            self.elements[elem_id.idx()] = Some(ElementAssignment {
                material: material.name.clone(),
                permeability,
                thickness: material.thickness,
                porosity: material.porosity.value,
            });
        }

        self.assigned_domains.insert(domain_name.to_string());
        tracing::debug!(material = material_name, domain = domain_name, count = elements.len(), "material assigned");
        Ok(())
    }

    /// Must be called before `initialise_solver` completes: every
    /// element in the mesh must carry an assignment.
    pub fn finalize(&self, mesh: &MeshGeometry) -> MaterialResult<()> {
        if self.elements.len() < mesh.element_count() {
            return Err(MaterialError::UnassignedElement {
                element: self.elements.len(),
            });
        }
        for (idx, assignment) in self.elements.iter().enumerate() {
            if assignment.is_none() {
                return Err(MaterialError::UnassignedElement { element: idx });
            }
        }
        Ok(())
    }

    pub fn assignment(&self, element: ElementId) -> Option<&ElementAssignment> {
        self.elements.get(element.idx()).and_then(|o| o.as_ref())
    }

    pub fn thickness(&self, element: ElementId) -> Real {
        self.assignment(element).map(|a| a.thickness).unwrap_or(0.0)
    }

    pub fn porosity(&self, element: ElementId) -> Real {
        self.assignment(element).map(|a| a.porosity).unwrap_or(0.0)
    }

    pub fn permeability(&self, element: ElementId) -> Matrix3<Real> {
        self.assignment(element)
            .map(|a| a.permeability)
            .unwrap_or_else(Matrix3::zeros)
    }

    /// Dense per-element thickness array, for `CVMesh::build`.
    pub fn thickness_array(&self) -> Vec<Real> {
        (0..self.elements.len())
            .map(|i| self.thickness(ElementId::from_index(i as u32)))
            .collect()
    }

    /// Dense per-element porosity array, for `CVMesh::build`.
    pub fn porosity_array(&self) -> Vec<Real> {
        (0..self.elements.len())
            .map(|i| self.porosity(ElementId::from_index(i as u32)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizzy_core::units::{m2, unitless};
    use lizzy_mesh::MeshInput;

    fn two_domain_mesh() -> MeshGeometry {
        let mut elem_sets = HashMap::new();
        elem_sets.insert("upper".to_string(), vec![0]);
        elem_sets.insert("lower".to_string(), vec![1]);
        let input = MeshInput {
            nodes: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            node_sets: Default::default(),
            elem_sets,
        };
        MeshGeometry::build(&input).unwrap()
    }

    #[test]
    fn unassigned_element_rejected_at_finalize() {
        let mesh = two_domain_mesh();
        let mut store = MaterialStore::new();
        store
            .create_material("resin", (m2(1e-10), m2(1e-10), m2(1e-10)), unitless(0.5), 1.0)
            .unwrap();
        store.assign_material("resin", "upper", &mesh, None).unwrap();
        assert!(store.finalize(&mesh).is_err());
        store.assign_material("resin", "lower", &mesh, None).unwrap();
        assert!(store.finalize(&mesh).is_ok());
    }

    #[test]
    fn duplicate_domain_assignment_rejected() {
        let mesh = two_domain_mesh();
        let mut store = MaterialStore::new();
        store
            .create_material("resin", (m2(1e-10), m2(1e-10), m2(1e-10)), unitless(0.5), 1.0)
            .unwrap();
        store.assign_material("resin", "upper", &mesh, None).unwrap();
        assert!(matches!(
            store.assign_material("resin", "upper", &mesh, None),
            Err(MaterialError::DomainAlreadyAssigned { .. })
        ));
    }

    #[test]
    fn unknown_material_and_domain_rejected() {
        let mesh = two_domain_mesh();
        let mut store = MaterialStore::new();
        assert!(matches!(
            store.assign_material("nope", "upper", &mesh, None),
            Err(MaterialError::UnknownMaterial { .. })
        ));
        store
            .create_material("resin", (m2(1e-10), m2(1e-10), m2(1e-10)), unitless(0.5), 1.0)
            .unwrap();
        assert!(matches!(
            store.assign_material("resin", "nope", &mesh, None),
            Err(MaterialError::UnknownDomain { .. })
        ));
    }
}
