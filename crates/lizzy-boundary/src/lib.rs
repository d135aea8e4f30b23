//! lizzy-boundary: named pressure inlets, the boundary-node assignment
//! they drive, and the deferred command queue that applies open/close/
//! pressure-change requests at step boundaries (spec §4.4, §5).

pub mod error;
pub mod inlet;
pub mod store;

pub use error::{BoundaryError, BoundaryResult};
pub use inlet::{Inlet, PressureMode};
pub use store::BoundaryStore;
