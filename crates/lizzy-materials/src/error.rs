//! Material configuration errors (spec §7: raised synchronously at the
//! offending call, before solver init — fully recoverable by the caller).

use thiserror::Error;

pub type MaterialResult<T> = Result<T, MaterialError>;

#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("material name already in use: {name}")]
    DuplicateMaterial { name: String },

    #[error("unknown material: {name}")]
    UnknownMaterial { name: String },

    #[error("unknown domain (physical surface): {name}")]
    UnknownDomain { name: String },

    #[error("domain already has a material assignment: {name}")]
    DomainAlreadyAssigned { name: String },

    #[error("porosity must be in (0, 1), got {value}")]
    InvalidPorosity { value: f64 },

    #[error("thickness must be positive, got {value}")]
    InvalidThickness { value: f64 },

    #[error("permeability components must be non-negative, got {value}")]
    NegativePermeability { value: f64 },

    #[error("rosette reference direction is parallel to the element normal on element {element}")]
    RosetteParallelToNormal { element: usize },

    #[error("element {element} has no material assignment")]
    UnassignedElement { element: usize },
}
