//! `AppError` aggregates every backend crate's error behind one
//! facade type, so a caller only ever needs to match on a single
//! error type regardless of which component actually failed.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration: a scripting-surface call was made out of the
    /// prescribed order (e.g. `create_material` before `read_mesh`,
    /// `solve` before `initialise_solver`).
    #[error("{what} requires {precondition} first")]
    OutOfOrder {
        what: &'static str,
        precondition: &'static str,
    },

    /// Configuration: an out-of-range numeric argument to a call made
    /// before `initialise_solver`.
    #[error("invalid value for {what}: {reason}")]
    InvalidParameter {
        what: &'static str,
        reason: &'static str,
    },

    /// Runtime invariant: the driver has already failed and every
    /// operation but result retrieval fails fast.
    #[error("the model has already failed and cannot take further actions")]
    ModelFailed,

    #[error(transparent)]
    Mesh(#[from] lizzy_mesh::MeshError),

    #[error(transparent)]
    Material(#[from] lizzy_materials::MaterialError),

    #[error(transparent)]
    Boundary(#[from] lizzy_boundary::BoundaryError),

    #[error(transparent)]
    Sensor(#[from] lizzy_sensors::SensorError),

    #[error(transparent)]
    Solver(#[from] lizzy_solver::SolverError),

    #[error(transparent)]
    Sim(#[from] lizzy_sim::SimError),

    #[error(transparent)]
    Io(#[from] lizzy_io::IoError),
}
