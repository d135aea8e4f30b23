use thiserror::Error;

pub type SensorResult<T> = Result<T, SensorError>;

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("sensor name already in use: {name}")]
    DuplicateSensor { name: String },

    #[error("unknown sensor: {name}")]
    UnknownSensor { name: String },

    /// Topological (spec §7): a sensor was located against a mesh with
    /// no elements at all, so no host (or nearest) element can exist.
    #[error("cannot locate sensors: mesh has no elements")]
    EmptyMesh,
}
