use thiserror::Error;

pub type BoundaryResult<T> = Result<T, BoundaryError>;

#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("inlet name already in use: {name}")]
    DuplicateInlet { name: String },

    #[error("unknown inlet: {name}")]
    UnknownInlet { name: String },

    #[error("unknown boundary (physical line): {name}")]
    UnknownBoundary { name: String },

    #[error("boundary already bound to an inlet: {name}")]
    BoundaryAlreadyAssigned { name: String },

    /// Runtime invariant (spec §7): all inlets closed when a step is
    /// attempted.
    #[error("no open inlet: a step cannot be taken while every inlet is closed")]
    NoOpenInlet,
}
