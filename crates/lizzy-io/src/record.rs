//! Serde-friendly mirror of [`lizzy_sim::Snapshot`] using the
//! contractual field names from spec §6: `Pressure` (per node, Pa),
//! `Velocity` (per element, 3-vector, m/s), `FillFactor` (per node,
//! dimensionless), `FreeSurface` (per node, 1 if front else 0).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use lizzy_core::Real;
use lizzy_sim::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InletRecord {
    pub name: String,
    pub p: Real,
    pub open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    pub name: String,
    pub p: Real,
    pub v: [Real; 3],
    pub f: Real,
    pub triggered_at: Option<Real>,
}

/// One write-out, field-named per the spec §6 results contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Simulation time of this write-out, s.
    pub t: Real,
    /// Per-node pressure, Pa.
    #[serde(rename = "Pressure")]
    pub pressure: Vec<Real>,
    /// Per-element velocity, 3-vector, m/s.
    #[serde(rename = "Velocity")]
    pub velocity: Vec<[Real; 3]>,
    /// Per-node fill factor, dimensionless, in [0, 1].
    #[serde(rename = "FillFactor")]
    pub fill_factor: Vec<Real>,
    /// Per-node free-surface indicator: 1 if the node's control volume
    /// is currently `front` (0 < f < 1 - fill_tolerance), else 0.
    #[serde(rename = "FreeSurface")]
    pub free_surface: Vec<u8>,
    pub inlets: Vec<InletRecord>,
    pub sensors: Vec<SensorRecord>,
}

impl FieldRecord {
    pub fn from_snapshot(snapshot: &Snapshot, fill_tolerance: Real) -> Self {
        let free_surface = snapshot
            .f
            .iter()
            .map(|&f| u8::from(f > 0.0 && f < 1.0 - fill_tolerance))
            .collect();
        let velocity = snapshot
            .v
            .iter()
            .map(|v| [v.x, v.y, v.z])
            .collect();
        let inlets = snapshot
            .inlet_states
            .iter()
            .map(|i| InletRecord {
                name: i.name.clone(),
                p: i.p,
                open: i.open,
            })
            .collect();
        let sensors = snapshot
            .sensor_readings
            .iter()
            .map(|s| SensorRecord {
                name: s.name.clone(),
                p: s.p,
                v: [s.v.x, s.v.y, s.v.z],
                f: s.f,
                triggered_at: s.triggered_at,
            })
            .collect();

        Self {
            t: snapshot.t,
            pressure: snapshot.p.clone(),
            velocity,
            fill_factor: snapshot.f.clone(),
            free_surface,
            inlets,
            sensors,
        }
    }
}

/// Written alongside the JSON-lines output as `<case_name>.manifest.json`:
/// the companion summary a results directory needs to be self-describing
/// (spec §6's "save_results(sol, case_name)" hands a writer exactly this
/// kind of run metadata). `run_id` is a content hash of the run's
/// snapshots, grounded on the teacher's content-based run-id hashing
/// (`tf-results`'s `compute_run_id`), so two identical runs produce the
/// same id and a changed run is immediately distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub case_name: String,
    pub snapshot_count: usize,
    pub run_id: String,
}

impl Manifest {
    pub fn new(case_name: &str, records: &[FieldRecord]) -> Self {
        let mut hasher = Sha256::new();
        for record in records {
            let json = serde_json::to_string(record).unwrap_or_default();
            hasher.update(json.as_bytes());
        }
        let run_id = format!("{:x}", hasher.finalize());
        Self {
            case_name: case_name.to_string(),
            snapshot_count: records.len(),
            run_id,
        }
    }
}
