//! `LizzyModel`: the single user-facing facade of the build-then-run
//! scripting surface, built from the narrow, separately-testable
//! components rather than as a god-object with hidden coupling. Each
//! public method maps onto exactly one step of the imperative call
//! order; `initialise_solver` is the phase boundary between "building"
//! (materials/inlets/sensors may still be added) and "running" (only
//! inlet mutation and sensor/solution queries are allowed).

use std::path::{Path, PathBuf};

use nalgebra::{Matrix3, Point3};

use lizzy_boundary::{BoundaryStore, PressureMode};
use lizzy_core::units::{DynVisc, Permeability, Pressure, Ratio, Time};
use lizzy_core::{ElementId, InletId, Real};
use lizzy_io::{FileResultsSink, IoResult};
use lizzy_materials::{MaterialStore, Rosette};
use lizzy_mesh::{CVMesh, MeshError, MeshGeometry, MeshInput, MeshSource};
use lizzy_sensors::SensorSet;
use lizzy_sim::{FillDriver, Solution, StopReason};
use lizzy_solver::{BackendKind, LinearAssembler, LinearSolver, SparsityPattern};

use crate::error::{AppError, AppResult};
use crate::params::SimulationParameters;

/// The components a model holds while still being configured, before
/// `initialise_solver` consumes them to build a [`FillDriver`].
struct Builder {
    mesh: MeshGeometry,
    materials: MaterialStore,
    boundary: BoundaryStore,
    sensors: SensorSet,
    params: SimulationParameters,
}

enum Phase {
    /// Mesh not yet read: `read_mesh` must be called first.
    NoMesh,
    /// Mesh read; materials/inlets/sensors/parameters may be assigned.
    Building(Box<Builder>),
    /// `initialise_solver` has run; the driver owns the simulation.
    Running(Box<FillDriver>),
}

/// The user-facing facade object (spec §6). Its `lightweight` flag is
/// an opaque bit the driver never interprets (spec §9 open question);
/// it exists purely for callers that want to tag a model instance.
pub struct LizzyModel {
    phase: Phase,
    lightweight: bool,
}

impl Default for LizzyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LizzyModel {
    pub fn new() -> Self {
        Self {
            phase: Phase::NoMesh,
            lightweight: false,
        }
    }

    pub fn lightweight(&self) -> bool {
        self.lightweight
    }

    pub fn set_lightweight(&mut self, value: bool) {
        self.lightweight = value;
    }

    /// 1. `read_mesh(path)`: here, an in-memory collaborator rather
    /// than a path, since the MSH v4 reader is out of scope (spec §1,
    /// §6). Building-time parameters default to `None` until
    /// `assign_simulation_parameters` is called.
    pub fn read_mesh(&mut self, source: &dyn MeshSource) -> AppResult<()> {
        let input = source.load()?;
        self.read_mesh_input(input)
    }

    /// Convenience overload taking an already-parsed [`MeshInput`]
    /// directly, for callers (and tests) that build a mesh in memory
    /// rather than through a [`MeshSource`].
    pub fn read_mesh_input(&mut self, input: MeshInput) -> AppResult<()> {
        if !matches!(self.phase, Phase::NoMesh) {
            return Err(AppError::OutOfOrder {
                what: "read_mesh",
                precondition: "a model with no mesh loaded yet",
            });
        }
        let mesh = MeshGeometry::build(&input)?;
        self.phase = Phase::Building(Box::new(Builder {
            mesh,
            materials: MaterialStore::new(),
            boundary: BoundaryStore::new(),
            sensors: SensorSet::new(),
            params: SimulationParameters::new(1.0, -1.0, 1e-3, false)?,
        }));
        Ok(())
    }

    fn building(&mut self) -> AppResult<&mut Builder> {
        match &mut self.phase {
            Phase::NoMesh => Err(AppError::OutOfOrder {
                what: "this call",
                precondition: "read_mesh",
            }),
            Phase::Building(b) => Ok(b),
            Phase::Running(_) => Err(AppError::OutOfOrder {
                what: "this call",
                precondition: "a model not yet passed to initialise_solver",
            }),
        }
    }

    fn running(&mut self) -> AppResult<&mut FillDriver> {
        match &mut self.phase {
            Phase::Running(d) => Ok(d),
            _ => Err(AppError::OutOfOrder {
                what: "this call",
                precondition: "initialise_solver",
            }),
        }
    }

    /// 2. `assign_simulation_parameters(mu, wo_delta_time,
    /// fill_tolerance, end_step_when_sensor_triggered)`.
    pub fn assign_simulation_parameters(
        &mut self,
        viscosity: DynVisc,
        wo_delta_time: Time,
        fill_tolerance: Ratio,
        end_step_when_sensor_triggered: bool,
    ) -> AppResult<()> {
        let params = SimulationParameters::new(
            viscosity.value,
            wo_delta_time.value,
            fill_tolerance.value,
            end_step_when_sensor_triggered,
        )?;
        self.building()?.params = params;
        Ok(())
    }

    /// 3. `create_material(name, (k1, k2, k3), phi, h)`.
    pub fn create_material(
        &mut self,
        name: impl Into<String>,
        permeability: (Permeability, Permeability, Permeability),
        porosity: Ratio,
        thickness: Real,
    ) -> AppResult<()> {
        self.building()?
            .materials
            .create_material(name, permeability, porosity, thickness)?;
        Ok(())
    }

    /// 3. `assign_material(material_name, domain_name, rosette?)`.
    pub fn assign_material(
        &mut self,
        material_name: &str,
        domain_name: &str,
        rosette: Option<Rosette>,
    ) -> AppResult<()> {
        let b = self.building()?;
        b.materials
            .assign_material(material_name, domain_name, &b.mesh, rosette)?;
        Ok(())
    }

    /// 4. `create_inlet(p, name)`.
    pub fn create_inlet(&mut self, name: impl Into<String>, p0: Pressure) -> AppResult<InletId> {
        Ok(self.building()?.boundary.create_inlet(name, p0)?)
    }

    /// 4. `assign_inlet(name, boundary_name)`.
    pub fn assign_inlet(&mut self, name: &str, boundary_name: &str) -> AppResult<()> {
        let b = self.building()?;
        b.boundary.assign_inlet(name, boundary_name, &b.mesh)?;
        Ok(())
    }

    /// 5. `create_sensor(name, position)`.
    pub fn create_sensor(&mut self, name: impl Into<String>, position: Point3<Real>) -> AppResult<()> {
        self.building()?.sensors.create_sensor(name, position)?;
        Ok(())
    }

    /// 6. `initialise_solver(backend)`: freezes mesh topology, checks
    /// every connected component has an inlet (spec §4.1 topological
    /// failure, raised here rather than in `MeshGeometry` itself),
    /// finalizes material assignment, builds the CV dual mesh and the
    /// fixed sparsity pattern, locates sensors, and constructs the
    /// [`FillDriver`] that owns the simulation from here on.
    pub fn initialise_solver(&mut self, backend: BackendKind) -> AppResult<()> {
        let phase = std::mem::replace(&mut self.phase, Phase::NoMesh);
        let Phase::Building(builder) = phase else {
            self.phase = phase;
            return Err(AppError::OutOfOrder {
                what: "initialise_solver",
                precondition: "a model with a mesh loaded and not already initialised",
            });
        };
        let mut builder = *builder;

        // Unassigned material is a Configuration error (spec §7): fully
        // recoverable, so the builder state is restored and the caller
        // may assign the missing domain and retry.
        if let Err(e) = builder.materials.finalize(&builder.mesh) {
            self.phase = Phase::Building(Box::new(builder));
            return Err(e.into());
        }

        let thickness = builder.materials.thickness_array();
        let porosity = builder.materials.porosity_array();
        let cv = CVMesh::build(&builder.mesh, &thickness, &porosity);

        // Disconnected-component-with-no-inlet and an empty mesh are
        // Topological errors (spec §7): fatal to the current model, so
        // the builder is intentionally not restored past this point.
        let inlet_nodes: std::collections::HashSet<_> = builder
            .boundary
            .inlets()
            .iter()
            .flat_map(|inlet| inlet.nodes.iter().copied())
            .collect();
        for component in cv.connected_components() {
            if !component.iter().any(|n| inlet_nodes.contains(n)) {
                return Err(AppError::Mesh(MeshError::DisconnectedComponentNoInlet));
            }
        }

        builder.sensors.locate(&builder.mesh)?;

        let Builder {
            mesh,
            materials,
            boundary,
            sensors,
            params,
        } = builder;

        let permeability: Vec<Matrix3<Real>> = (0..mesh.element_count())
            .map(|i| materials.permeability(ElementId::from_index(i as u32)))
            .collect();

        let pattern = SparsityPattern::build(&cv);
        let assembler = LinearAssembler::new(mesh.clone(), &materials, params.viscosity);
        let solver = LinearSolver::new(backend);

        let driver = FillDriver::new(
            mesh,
            cv,
            permeability,
            params.viscosity,
            assembler,
            pattern,
            solver,
            boundary,
            sensors,
            params.fill_tolerance,
            params.wo_delta_time,
            params.end_step_when_sensor_triggered,
        );

        tracing::info!(backend = ?backend, "solver initialised");
        self.phase = Phase::Running(Box::new(driver));
        Ok(())
    }

    /// 7. `solve()`: run to completion (alias of `solve_time_interval`
    /// with an unbounded interval, per spec §9 open question).
    pub fn solve(&mut self) -> AppResult<StopReason> {
        Ok(self.running()?.solve()?)
    }

    /// 7. `solve_time_interval(delta_t)`. `solve_step` in some
    /// documentation states names the same operation (spec §9 open
    /// question): both are aliases for this one method, taking at
    /// least one internal step and clamping the last one down to the
    /// interval boundary.
    pub fn solve_time_interval(&mut self, delta_t: Real) -> AppResult<StopReason> {
        Ok(self.running()?.solve_time_interval(delta_t)?)
    }

    /// Alias of [`Self::solve_time_interval`] (spec §9 open question:
    /// the two public names are treated as one operation).
    pub fn solve_step(&mut self, delta_t: Real) -> AppResult<StopReason> {
        self.solve_time_interval(delta_t)
    }

    /// 8. `change_inlet_pressure(name, value, mode)`.
    pub fn change_inlet_pressure(&mut self, name: &str, value: Pressure, mode: PressureMode) -> AppResult<()> {
        match &mut self.phase {
            Phase::Building(b) => Ok(b.boundary.change_inlet_pressure(name, value, mode)?),
            Phase::Running(d) => Ok(d.boundary_mut().change_inlet_pressure(name, value, mode)?),
            Phase::NoMesh => Err(AppError::OutOfOrder {
                what: "change_inlet_pressure",
                precondition: "read_mesh and create_inlet",
            }),
        }
    }

    /// 8. `open_inlet(name)`.
    pub fn open_inlet(&mut self, name: &str) -> AppResult<()> {
        match &mut self.phase {
            Phase::Building(b) => Ok(b.boundary.open_inlet(name)?),
            Phase::Running(d) => Ok(d.boundary_mut().open_inlet(name)?),
            Phase::NoMesh => Err(AppError::OutOfOrder {
                what: "open_inlet",
                precondition: "read_mesh and create_inlet",
            }),
        }
    }

    /// 8. `close_inlet(name)`.
    pub fn close_inlet(&mut self, name: &str) -> AppResult<()> {
        match &mut self.phase {
            Phase::Building(b) => Ok(b.boundary.close_inlet(name)?),
            Phase::Running(d) => Ok(d.boundary_mut().close_inlet(name)?),
            Phase::NoMesh => Err(AppError::OutOfOrder {
                what: "close_inlet",
                precondition: "read_mesh and create_inlet",
            }),
        }
    }

    /// Read-only access to the running driver's accumulated solution.
    /// Available once `initialise_solver` has run, including after a
    /// runtime failure (spec §7: "leaves the last valid snapshot
    /// accessible").
    pub fn solution(&self) -> AppResult<&Solution> {
        match &self.phase {
            Phase::Running(d) => Ok(d.solution()),
            _ => Err(AppError::OutOfOrder {
                what: "solution",
                precondition: "initialise_solver",
            }),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(&self.phase, Phase::Running(d) if d.is_failed())
    }

    /// 9. `save_results(sol, case_name)`: hands the accumulated
    /// solution to the ambient JSON-lines results sink (spec §6 — the
    /// real XDMF+HDF5 writer is out of scope).
    pub fn save_results(&self, root: impl AsRef<Path>, case_name: &str) -> AppResult<PathBuf> {
        let solution = self.solution()?;
        let fill_tolerance = match &self.phase {
            Phase::Running(d) => d.fill_tolerance(),
            _ => unreachable!("solution() above already required Phase::Running"),
        };
        let mut sink = FileResultsSink::create(root, case_name)?;
        write_solution(&mut sink, solution, fill_tolerance)?;
        Ok(sink.path().to_path_buf())
    }
}

fn write_solution(sink: &mut FileResultsSink, solution: &Solution, fill_tolerance: Real) -> IoResult<()> {
    sink.write_solution(solution, fill_tolerance)
}
