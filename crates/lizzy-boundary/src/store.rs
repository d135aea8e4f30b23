//! BoundaryStore (component #4): named pressure inlets.
//!
//! Mutations requested after `initialise_solver` (`open`, `close`,
//! `change_pressure`) are queued and only take effect when
//! [`BoundaryStore::apply_pending`] is called at the top of a step
//! (spec §5, §9: "apply changes only at step boundaries").

use std::collections::{HashMap, HashSet};

use lizzy_core::units::Pressure;
use lizzy_core::{InletId, Real};
use lizzy_mesh::MeshGeometry;

use crate::error::{BoundaryError, BoundaryResult};
use crate::inlet::{Inlet, PressureMode};

#[derive(Debug, Clone)]
enum PendingChange {
    Open(InletId),
    Close(InletId),
    Pressure(InletId, Real, PressureMode),
}

#[derive(Debug, Default)]
pub struct BoundaryStore {
    by_name: HashMap<String, InletId>,
    inlets: Vec<Inlet>,
    assigned_boundaries: HashSet<String>,
    queue: Vec<PendingChange>,
}

impl BoundaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_inlet(&mut self, name: impl Into<String>, p0: Pressure) -> BoundaryResult<InletId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(BoundaryError::DuplicateInlet { name });
        }
        let id = InletId::from_index(self.inlets.len() as u32);
        self.inlets.push(Inlet::new(id, name.clone(), p0.value));
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn assign_inlet(
        &mut self,
        name: &str,
        boundary_name: &str,
        mesh: &MeshGeometry,
    ) -> BoundaryResult<()> {
        let id = *self
            .by_name
            .get(name)
            .ok_or_else(|| BoundaryError::UnknownInlet {
                name: name.to_string(),
            })?;
        if self.assigned_boundaries.contains(boundary_name) {
            return Err(BoundaryError::BoundaryAlreadyAssigned {
                name: boundary_name.to_string(),
            });
        }
        let nodes = mesh
            .node_set(boundary_name)
            .map_err(|_| BoundaryError::UnknownBoundary {
                name: boundary_name.to_string(),
            })?
            .to_vec();
        self.inlets[id.idx()].nodes = nodes;
        self.assigned_boundaries.insert(boundary_name.to_string());
        Ok(())
    }

    fn resolve(&self, name: &str) -> BoundaryResult<InletId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| BoundaryError::UnknownInlet {
                name: name.to_string(),
            })
    }

    /// Queue: restore the inlet to its last assigned pressure and mark
    /// it open. Takes effect at the next step boundary.
    pub fn open_inlet(&mut self, name: &str) -> BoundaryResult<()> {
        let id = self.resolve(name)?;
        self.queue.push(PendingChange::Open(id));
        Ok(())
    }

    /// Queue: mark the inlet closed (its nodes become natural-Neumann
    /// walls). Takes effect at the next step boundary.
    pub fn close_inlet(&mut self, name: &str) -> BoundaryResult<()> {
        let id = self.resolve(name)?;
        self.queue.push(PendingChange::Close(id));
        Ok(())
    }

    /// Queue a pressure change, either setting the absolute value or
    /// adding a delta to the last assigned pressure.
    pub fn change_inlet_pressure(
        &mut self,
        name: &str,
        value: Pressure,
        mode: PressureMode,
    ) -> BoundaryResult<()> {
        let id = self.resolve(name)?;
        self.queue.push(PendingChange::Pressure(id, value.value, mode));
        Ok(())
    }

    /// Drain the pending command queue, applying every change in the
    /// order received. Called by the driver at the top of each step.
    pub fn apply_pending(&mut self) {
        for change in self.queue.drain(..) {
            match change {
                PendingChange::Open(id) => {
                    let inlet = &mut self.inlets[id.idx()];
                    inlet.p = inlet.last_assigned;
                    inlet.open = true;
                }
                PendingChange::Close(id) => {
                    self.inlets[id.idx()].open = false;
                }
                PendingChange::Pressure(id, value, mode) => {
                    let inlet = &mut self.inlets[id.idx()];
                    inlet.last_assigned = match mode {
                        PressureMode::Set => value,
                        PressureMode::Delta => inlet.last_assigned + value,
                    };
                    if inlet.open {
                        inlet.p = inlet.last_assigned;
                    }
                }
            }
        }
    }

    pub fn inlets(&self) -> &[Inlet] {
        &self.inlets
    }

    pub fn any_open(&self) -> bool {
        self.inlets.iter().any(|i| i.open)
    }

    /// Enforce the runtime invariant: at least one inlet must be open
    /// whenever the driver advances.
    pub fn require_open(&self) -> BoundaryResult<()> {
        if self.any_open() {
            Ok(())
        } else {
            Err(BoundaryError::NoOpenInlet)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizzy_core::units::pa;
    use lizzy_mesh::MeshInput;
    use std::collections::HashMap as Map;

    fn mesh_with_left_edge() -> MeshGeometry {
        let mut node_sets = Map::new();
        node_sets.insert("left_edge".to_string(), vec![0, 3]);
        let input = MeshInput {
            nodes: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            node_sets,
            elem_sets: Default::default(),
        };
        MeshGeometry::build(&input).unwrap()
    }

    #[test]
    fn close_then_open_restores_last_assigned() {
        let mesh = mesh_with_left_edge();
        let mut store = BoundaryStore::new();
        store.create_inlet("inlet", pa(1e5)).unwrap();
        store.assign_inlet("inlet", "left_edge", &mesh).unwrap();

        store
            .change_inlet_pressure("inlet", pa(6e4), PressureMode::Delta)
            .unwrap();
        store.apply_pending();
        assert!((store.inlets()[0].p - 1.6e5).abs() < 1e-9);

        store.close_inlet("inlet").unwrap();
        store.apply_pending();
        assert!(!store.inlets()[0].open);
        assert!((store.inlets()[0].p - 1.6e5).abs() < 1e-9); // unchanged while closed

        store
            .change_inlet_pressure("inlet", pa(2e5), PressureMode::Set)
            .unwrap();
        store.apply_pending();
        assert!((store.inlets()[0].p - 1.6e5).abs() < 1e-9); // not yet open

        store.open_inlet("inlet").unwrap();
        store.apply_pending();
        assert!(store.inlets()[0].open);
        assert!((store.inlets()[0].p - 2e5).abs() < 1e-9); // restored to last assigned
    }

    #[test]
    fn closing_only_inlet_violates_invariant() {
        let mesh = mesh_with_left_edge();
        let mut store = BoundaryStore::new();
        store.create_inlet("inlet", pa(1e5)).unwrap();
        store.assign_inlet("inlet", "left_edge", &mesh).unwrap();

        store.close_inlet("inlet").unwrap();
        store.apply_pending();
        assert!(matches!(store.require_open(), Err(BoundaryError::NoOpenInlet)));
    }

    #[test]
    fn duplicate_boundary_assignment_rejected() {
        let mesh = mesh_with_left_edge();
        let mut store = BoundaryStore::new();
        store.create_inlet("a", pa(1e5)).unwrap();
        store.create_inlet("b", pa(1e5)).unwrap();
        store.assign_inlet("a", "left_edge", &mesh).unwrap();
        assert!(matches!(
            store.assign_inlet("b", "left_edge", &mesh),
            Err(BoundaryError::BoundaryAlreadyAssigned { .. })
        ));
    }
}
