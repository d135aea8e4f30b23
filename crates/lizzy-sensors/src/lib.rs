//! lizzy-sensors: point probes resolved against host mesh elements,
//! sampled once per FillDriver step (spec §4.7).

pub mod error;
pub mod sensor;
pub mod store;

pub use error::{SensorError, SensorResult};
pub use sensor::Sensor;
pub use store::SensorSet;
