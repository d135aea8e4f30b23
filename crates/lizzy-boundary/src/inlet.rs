//! A pressure inlet: name, current/initial pressure, open state, and
//! the boundary nodes it drives (spec §3, §4.4).

use lizzy_core::{InletId, NodeId, Real};

#[derive(Debug, Clone)]
pub struct Inlet {
    pub id: InletId,
    pub name: String,
    /// Pressure currently imposed on the inlet nodes while open (Pa).
    pub p: Real,
    /// Pressure the inlet was created with; never mutated afterwards.
    pub p0: Real,
    /// Most recently assigned pressure, restored by `open()`.
    pub(crate) last_assigned: Real,
    pub open: bool,
    pub nodes: Vec<NodeId>,
}

impl Inlet {
    pub(crate) fn new(id: InletId, name: impl Into<String>, p0: Real) -> Self {
        Self {
            id,
            name: name.into(),
            p: p0,
            p0,
            last_assigned: p0,
            open: true,
            nodes: Vec::new(),
        }
    }
}

/// Whether `change_inlet_pressure` sets the absolute value or adds a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureMode {
    Set,
    Delta,
}
