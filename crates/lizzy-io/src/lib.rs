//! lizzy-io: the results contract between the fill driver and an
//! external results writer (spec §6: "Results output (XDMF+HDF5)").
//!
//! The real XDMF+HDF5 writer is out of scope (spec §1); this crate
//! specifies the field-name contract (`Pressure`, `Velocity`,
//! `FillFactor`, `FreeSurface`) any such writer must honour, via the
//! [`ResultsSink`] trait, and ships one concrete, inspectable
//! implementation — a JSON-lines sink — as the ambient test/inspection
//! tooling a complete repo still needs.

pub mod error;
pub mod record;
pub mod sink;

pub use error::{IoError, IoResult};
pub use record::{FieldRecord, InletRecord, Manifest, SensorRecord};
pub use sink::{FileResultsSink, ResultsSink};
