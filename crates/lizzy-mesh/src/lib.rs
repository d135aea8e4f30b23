//! lizzy-mesh: mesh geometry and control-volume dual mesh.
//!
//! - [`input`]: the `MeshInput` ingestion contract and `MeshSource` trait
//!   an external reader implements (the MSH v4 parser is out of scope).
//! - [`geometry`]: `MeshGeometry`, the frozen triangle/node geometry.
//! - [`cv`]: `CVMesh`, the median-dual control-volume tessellation.

pub mod cv;
pub mod error;
pub mod geometry;
pub mod input;

pub use cv::{CVMesh, EdgeFaceContribution};
pub use error::{MeshError, MeshResult};
pub use geometry::{MeshGeometry, Triangle};
pub use input::{MeshInput, MeshSource};
