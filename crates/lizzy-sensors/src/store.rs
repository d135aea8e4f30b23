//! SensorSet (component #5): point probes created before solver
//! init, resolved against the mesh at init time, and sampled once per
//! FillDriver step (spec §4.7).

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use lizzy_core::{NodeId, Real, SensorId};
use lizzy_mesh::MeshGeometry;

use crate::error::{SensorError, SensorResult};
use crate::sensor::{barycentric_in_element, is_contained, Sensor};

#[derive(Debug, Default)]
pub struct SensorSet {
    by_name: HashMap<String, SensorId>,
    sensors: Vec<Sensor>,
    located: bool,
}

impl SensorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_sensor(
        &mut self,
        name: impl Into<String>,
        position: Point3<Real>,
    ) -> SensorResult<SensorId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(SensorError::DuplicateSensor { name });
        }
        let id = SensorId::from_index(self.sensors.len() as u32);
        self.sensors.push(Sensor::placeholder(id, name.clone(), position));
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Resolve every sensor's host element: the element whose
    /// plane-projected containment test holds, or (failing that) the
    /// element with the nearest centroid. Called once, at solver init.
    pub fn locate(&mut self, mesh: &MeshGeometry) -> SensorResult<()> {
        if mesh.element_count() == 0 {
            return Err(SensorError::EmptyMesh);
        }
        for sensor in &mut self.sensors {
            let mut nearest: Option<(usize, Real)> = None;
            let mut contained: Option<(usize, [Real; 3])> = None;

            for tri in mesh.triangles() {
                let weights = match barycentric_in_element(mesh, tri, &sensor.position) {
                    Some(w) => w,
                    None => continue,
                };
                if contained.is_none() && is_contained(&weights) {
                    contained = Some((tri.id.idx(), weights));
                }
                let dist = (tri.centroid - sensor.position).norm();
                if nearest.map_or(true, |(_, best)| dist < best) {
                    nearest = Some((tri.id.idx(), dist));
                }
            }

            let (elem_idx, weights) = match contained {
                Some((idx, w)) => (idx, w),
                None => {
                    let (idx, _) = nearest.expect("mesh has at least one element");
                    let tri = &mesh.triangles()[idx];
                    let raw = barycentric_in_element(mesh, tri, &sensor.position)
                        .unwrap_or([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
                    (idx, raw)
                }
            };

            sensor.host_element = mesh.triangles()[elem_idx].id;
            sensor.weights = weights;
        }
        self.located = true;
        tracing::debug!(count = self.sensors.len(), "sensors located");
        Ok(())
    }

    /// Sample pressure/fill at each sensor's host element (interpolated
    /// over its three nodes) and velocity (constant per element); latch
    /// the first-wet trigger time.
    pub fn sample(
        &mut self,
        mesh: &MeshGeometry,
        p: &[Real],
        f: &[Real],
        v_per_element: &[Vector3<Real>],
        t: Real,
        fill_tolerance: Real,
    ) {
        for sensor in &mut self.sensors {
            let tri = mesh.triangle(sensor.host_element);
            let node_at = |i: usize| -> NodeId { tri.nodes[i] };
            let w = sensor.weights;

            let interp = |field: &[Real]| -> Real {
                (0..3).map(|i| w[i] * field[node_at(i).idx()]).sum()
            };

            sensor.p = interp(p);
            sensor.f = interp(f);
            sensor.v = v_per_element[sensor.host_element.idx()];

            if sensor.triggered_at.is_none() && sensor.f >= 1.0 - fill_tolerance {
                sensor.triggered_at = Some(t);
            }
        }
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn any_triggered(&self) -> bool {
        self.sensors.iter().any(Sensor::is_triggered)
    }

    pub fn is_located(&self) -> bool {
        self.located
    }
}
