//! lizzy-core: stable foundation shared by every Lizzy crate.
//!
//! Contains:
//! - ids (stable compact IDs for nodes/elements/materials/inlets/sensors)
//! - numeric (`Real` + tolerances + float helpers)
//! - units (uom SI wrappers used at public API boundaries)
//! - error (shared error scaffolding; each crate defines its own enum,
//!   tagged to one of Configuration, Topological, Runtime invariant,
//!   Numeric, or I/O)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{LizzyError, LizzyResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
