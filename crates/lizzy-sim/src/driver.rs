//! FillDriver (component #8): owns the clock, the fill-factor vector,
//! and the solution snapshot list; orchestrates assemble -> solve ->
//! velocity -> advect -> event-merge -> snapshot each step (spec
//! §4.8).

use nalgebra::{Matrix3, Vector3};

use lizzy_boundary::{BoundaryError, BoundaryStore};
use lizzy_core::{NodeId, Real};
use lizzy_mesh::{CVMesh, MeshGeometry};
use lizzy_sensors::SensorSet;
use lizzy_solver::{AssembledSystem, LinearAssembler, LinearSolver, SparsityPattern};

use crate::advection::{cfl_dt, fill_rates};
use crate::error::{SimError, SimResult};
use crate::schedule::clamp_to_events;
use crate::snapshot::{InletSnapshot, SensorSnapshot, Snapshot, Solution};
use crate::velocity::element_velocity;

/// Tolerance guarding the "no back transitions" invariant when
/// checking fill monotonicity between steps.
const MONOTONE_TOL: Real = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CvState {
    Dry,
    Front,
    Wet,
}

fn classify(f: Real, fill_tolerance: Real) -> CvState {
    if f >= 1.0 - fill_tolerance {
        CvState::Wet
    } else if f > 0.0 {
        CvState::Front
    } else {
        CvState::Dry
    }
}

pub struct FillDriver {
    mesh: MeshGeometry,
    cv: CVMesh,
    permeability: Vec<Matrix3<Real>>,
    viscosity: Real,
    assembler: LinearAssembler,
    pattern: SparsityPattern,
    solver: LinearSolver,
    boundary: BoundaryStore,
    sensors: SensorSet,

    fill_tolerance: Real,
    wo_delta_time: Real,
    end_step_when_sensor_triggered: bool,

    t: Real,
    f: Vec<Real>,
    p: Vec<Real>,
    v: Vec<Vector3<Real>>,
    states: Vec<CvState>,
    next_writeout: Real,
    solution: Solution,
    failed: bool,
    /// Latches true the first time a step completes with an inlet open.
    /// `NoOpenInlet` is only fatal before this has ever happened
    /// (spec §8 scenario 6, "all inlets closed"); once the fill has
    /// made progress under an open inlet, later closing it (scenario
    /// 5, "close/reopen") just freezes fill with a no-flow step instead
    /// of aborting the run.
    ever_open: bool,
}

/// Why a run (`solve` / `solve_time_interval`) stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Finished,
    IntervalElapsed,
    SensorTriggered,
}

impl FillDriver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mesh: MeshGeometry,
        cv: CVMesh,
        permeability: Vec<Matrix3<Real>>,
        viscosity: Real,
        assembler: LinearAssembler,
        pattern: SparsityPattern,
        solver: LinearSolver,
        boundary: BoundaryStore,
        sensors: SensorSet,
        fill_tolerance: Real,
        wo_delta_time: Real,
        end_step_when_sensor_triggered: bool,
    ) -> Self {
        let n = mesh.node_count();
        let elem_count = mesh.element_count();
        let mut f = vec![0.0; n];
        // Injection gates are pre-wetted: they are the physical source
        // of resin, so upwind gating (which requires a positive-fill
        // donor) must not block the very first step.
        for inlet in boundary.inlets() {
            for &node in &inlet.nodes {
                f[node.idx()] = 1.0;
            }
        }
        let states = f.iter().map(|&fi| classify(fi, fill_tolerance)).collect();
        let next_writeout = if wo_delta_time > 0.0 { wo_delta_time } else { 0.0 };

        Self {
            mesh,
            cv,
            permeability,
            viscosity,
            assembler,
            pattern,
            solver,
            boundary,
            sensors,
            fill_tolerance,
            wo_delta_time,
            end_step_when_sensor_triggered,
            t: 0.0,
            f,
            p: vec![0.0; n],
            v: vec![Vector3::zeros(); elem_count],
            states,
            next_writeout,
            solution: Solution::new(),
            failed: false,
            ever_open: false,
        }
    }

    pub fn time(&self) -> Real {
        self.t
    }

    pub fn fill(&self) -> &[Real] {
        &self.f
    }

    pub fn pressure(&self) -> &[Real] {
        &self.p
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn all_wet(&self) -> bool {
        self.states.iter().all(|&s| s == CvState::Wet)
    }

    pub fn fill_tolerance(&self) -> Real {
        self.fill_tolerance
    }

    /// Mutable access to the boundary store so a caller can queue inlet
    /// pressure/open/close changes between steps (spec §5, §9): they
    /// are drained at the top of the next step, never mid-assembly.
    pub fn boundary_mut(&mut self) -> &mut BoundaryStore {
        &mut self.boundary
    }

    /// Run to completion (every CV wet) or until a sensor trigger ends
    /// the run, whichever the configuration selects. Alias of
    /// `solve_time_interval` with an unbounded interval.
    pub fn solve(&mut self) -> SimResult<StopReason> {
        self.run_until(Real::INFINITY)
    }

    /// Advance the simulation by at most `delta_t` seconds. At least
    /// one internal step is taken even if `delta_t` is shorter than
    /// the CFL-bound step; the last internal step is clamped down to
    /// land exactly on the interval boundary.
    pub fn solve_time_interval(&mut self, delta_t: Real) -> SimResult<StopReason> {
        if !(delta_t > 0.0) {
            return Err(SimError::NegativeDt { dt: delta_t });
        }
        self.run_until(self.t + delta_t)
    }

    fn run_until(&mut self, interval_end: Real) -> SimResult<StopReason> {
        if self.failed {
            return Err(SimError::DriverFailed);
        }
        loop {
            match self.step(interval_end) {
                Ok(Some(reason)) => return Ok(reason),
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    return Err(e);
                }
            }
        }
    }

    /// One internal step of the spec §4.8 algorithm. Returns
    /// `Some(reason)` when the run should stop, `None` to keep going.
    fn step(&mut self, interval_end: Real) -> SimResult<Option<StopReason>> {
        self.boundary.apply_pending();

        if self.all_wet() {
            return Ok(Some(StopReason::Finished));
        }

        // "No inlet open" is only fatal before any inlet has ever driven
        // a step (spec §8 scenario 6). Once fill has made progress,
        // closing the only inlet (scenario 5) just freezes the front: p
        // solves to 0 everywhere wet nodes aren't Dirichlet-pinned, so
        // velocity and fill-rate are naturally zero and the step is a
        // no-op, not an error.
        let any_open = self.boundary.any_open();
        if any_open {
            self.ever_open = true;
        } else if !self.ever_open {
            return Err(BoundaryError::NoOpenInlet.into());
        }

        let open_inlet_nodes: Vec<(NodeId, Real)> = self
            .boundary
            .inlets()
            .iter()
            .filter(|inlet| inlet.open)
            .flat_map(|inlet| inlet.nodes.iter().map(move |&n| (n, inlet.p)))
            .collect();

        let system: AssembledSystem<'_> =
            self.assembler
                .assemble(&self.pattern, &self.f, self.fill_tolerance, &open_inlet_nodes)?;
        let p = self.solver.solve(&system)?;

        let v = self.element_velocities(&p);
        let fdot = fill_rates(&self.cv, &v, &self.f);

        let is_active: Vec<bool> = self.states.iter().map(|&s| s != CvState::Wet).collect();
        let candidate_dt = match cfl_dt(&self.f, &fdot, &is_active) {
            Some(dt) => dt,
            // No CV is actively filling because the only inlet is
            // currently closed: nothing bounds the step, so take the
            // rest of the requested interval in one no-flow step. An
            // unbounded `solve()` with nothing ever going to fill again
            // has no such bound to fall back on and is a genuine stall.
            None if !any_open && interval_end.is_finite() => interval_end - self.t,
            None => return Err(SimError::Stalled),
        };

        let next_wo = if self.wo_delta_time > 0.0 {
            Some(self.next_writeout)
        } else {
            None
        };
        let dt = clamp_to_events(candidate_dt, self.t, interval_end, next_wo);
        if !(dt > 0.0) {
            return Err(SimError::NegativeDt { dt });
        }

        let mut new_f = self.f.clone();
        for i in 0..new_f.len() {
            new_f[i] = (self.f[i] + dt * fdot[i]).clamp(0.0, 1.0);
            if new_f[i] + MONOTONE_TOL < self.f[i] {
                return Err(SimError::NonMonotoneFill {
                    node: i,
                    amount: self.f[i] - new_f[i],
                });
            }
        }

        let new_states: Vec<CvState> = new_f.iter().map(|&fi| classify(fi, self.fill_tolerance)).collect();
        for (old, new) in self.states.iter().zip(&new_states) {
            debug_assert!(!(*old == CvState::Wet && *new != CvState::Wet), "wet CV must not un-wet");
        }

        self.f = new_f;
        self.states = new_states;
        self.p = p;
        self.v = v;
        self.t += dt;

        self.sensors
            .sample(&self.mesh, &self.p, &self.f, &self.v, self.t, self.fill_tolerance);
        let sensor_triggered_now = self
            .sensors
            .sensors()
            .iter()
            .any(|s| s.triggered_at == Some(self.t));

        let every_step = self.wo_delta_time < 0.0;
        let due = every_step || (self.wo_delta_time > 0.0 && self.t + 1e-12 >= self.next_writeout);
        let forced = sensor_triggered_now && self.end_step_when_sensor_triggered;
        if due || forced || self.t >= interval_end - 1e-12 || self.all_wet() {
            self.write_snapshot();
            if self.wo_delta_time > 0.0 && due {
                self.next_writeout += self.wo_delta_time;
            }
        }

        if forced {
            return Ok(Some(StopReason::SensorTriggered));
        }
        if self.all_wet() {
            return Ok(Some(StopReason::Finished));
        }
        if self.t >= interval_end - 1e-12 {
            return Ok(Some(StopReason::IntervalElapsed));
        }
        Ok(None)
    }

    fn element_velocities(&self, p: &[Real]) -> Vec<Vector3<Real>> {
        self.mesh
            .triangles()
            .iter()
            .map(|tri| {
                let k = &self.permeability[tri.id.idx()];
                let p0 = self.mesh.position(tri.nodes[0]);
                let p1 = self.mesh.position(tri.nodes[1]);
                let p2 = self.mesh.position(tri.nodes[2]);
                element_velocity(
                    tri,
                    k,
                    self.viscosity,
                    p0,
                    p1,
                    p2,
                    p[tri.nodes[0].idx()],
                    p[tri.nodes[1].idx()],
                    p[tri.nodes[2].idx()],
                )
            })
            .collect()
    }

    fn write_snapshot(&mut self) {
        let inlet_states = self
            .boundary
            .inlets()
            .iter()
            .map(|inlet| InletSnapshot {
                name: inlet.name.clone(),
                p: inlet.p,
                open: inlet.open,
            })
            .collect();
        let sensor_readings = self
            .sensors
            .sensors()
            .iter()
            .map(|s| SensorSnapshot {
                name: s.name.clone(),
                p: s.p,
                v: s.v,
                f: s.f,
                triggered_at: s.triggered_at,
            })
            .collect();
        self.solution.push(Snapshot {
            t: self.t,
            p: self.p.clone(),
            v: self.v.clone(),
            f: self.f.clone(),
            inlet_states,
            sensor_readings,
        });
    }
}
