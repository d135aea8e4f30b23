//! Mesh ingestion and geometry errors.
//!
//! `ZeroAreaElement`, `NonTriangular` and `DisconnectedComponent` are
//! topological errors (spec §7): raised at `initialise_solver` time and
//! fatal to the current model. The rest are configuration errors raised
//! synchronously at the offending call.

use thiserror::Error;

pub type MeshResult<T> = Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("element {element} is not a triangle (non-triangular elements are out of scope)")]
    NonTriangular { element: usize },

    #[error("element {element} has zero or negative area")]
    ZeroAreaElement { element: usize },

    #[error("triangle {element} references out-of-range node index {node}")]
    NodeIndexOob { element: usize, node: usize },

    #[error("unknown physical surface (domain) name: {name}")]
    UnknownDomain { name: String },

    #[error("unknown physical line (boundary) name: {name}")]
    UnknownBoundary { name: String },

    #[error("mesh has a connected component with no open inlet")]
    DisconnectedComponentNoInlet,

    #[error("I/O error reading mesh: {message}")]
    Io { message: String },
}
