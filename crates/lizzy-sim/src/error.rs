use thiserror::Error;

use lizzy_boundary::BoundaryError;
use lizzy_solver::SolverError;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// Runtime invariant (spec §7): no inlet was open when a step was
    /// attempted.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// Numeric / runtime invariant (spec §7): assembly or solve failed,
    /// including a persistent non-convergence after the one automatic
    /// iterative-to-direct downgrade.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Runtime invariant: a computed dt was not strictly positive
    /// (logic bug, per spec §4.8 failure semantics).
    #[error("computed a non-positive time step: {dt:e}")]
    NegativeDt { dt: f64 },

    /// Runtime invariant: some CV's fill factor decreased by more than
    /// the numerical tolerance within a single step.
    #[error("fill factor decreased at node {node} by {amount:e}, exceeding tolerance")]
    NonMonotoneFill { node: usize, amount: f64 },

    /// Runtime invariant: no front or dry CV has positive net inflow,
    /// so there is no physical basis for an adaptive time step, yet
    /// the fill is not complete either.
    #[error("fill stalled: no control volume ahead of the front is receiving net inflow")]
    Stalled,

    /// The driver already failed a previous step; per spec §7 every
    /// operation other than result retrieval fails fast afterwards.
    #[error("the driver has already failed and cannot take further steps")]
    DriverFailed,
}
