//! Solution snapshots (spec §3): one owned, deep-copied record per
//! write-out. Callers holding an old [`Solution`] never observe a
//! later mutation of the driver's internal state (spec §5).

use nalgebra::Vector3;

use lizzy_core::Real;

/// State of one inlet at the time a snapshot was taken.
#[derive(Debug, Clone)]
pub struct InletSnapshot {
    pub name: String,
    pub p: Real,
    pub open: bool,
}

/// A sensor's sampled fields at the time a snapshot was taken.
#[derive(Debug, Clone)]
pub struct SensorSnapshot {
    pub name: String,
    pub p: Real,
    pub v: Vector3<Real>,
    pub f: Real,
    pub triggered_at: Option<Real>,
}

/// One write-out: nodal pressure and fill factor, per-element
/// velocity, and the state of every inlet and sensor at time `t`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub t: Real,
    pub p: Vec<Real>,
    pub v: Vec<Vector3<Real>>,
    pub f: Vec<Real>,
    pub inlet_states: Vec<InletSnapshot>,
    pub sensor_readings: Vec<SensorSnapshot>,
}

/// An ordered sequence of snapshots (spec §3).
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub snapshots: Vec<Snapshot>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}
