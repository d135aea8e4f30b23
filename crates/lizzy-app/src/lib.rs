//! lizzy-app: `LizzyModel`, the single user-facing facade mapping onto
//! the imperative build-then-run scripting surface, built from the
//! narrow components in `lizzy-mesh`/`lizzy-materials`/
//! `lizzy-boundary`/`lizzy-sensors`/`lizzy-solver`/`lizzy-sim`/
//! `lizzy-io` rather than as a god-object with hidden coupling.

pub mod error;
pub mod model;
pub mod params;

pub use error::{AppError, AppResult};
pub use model::LizzyModel;
pub use params::SimulationParameters;

// Re-export the types a caller needs to drive the facade without
// depending on every backend crate directly.
pub use lizzy_boundary::PressureMode;
pub use lizzy_materials::Rosette;
pub use lizzy_mesh::MeshInput;
pub use lizzy_sim::StopReason;
pub use lizzy_solver::BackendKind;
