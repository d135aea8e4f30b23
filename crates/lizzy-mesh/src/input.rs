//! The mesh ingestion contract.
//!
//! `MeshInput` is the struct the (out-of-scope) MSH v4 ASCII reader hands
//! to the engine: node coordinates, 0-based triangle connectivity, named
//! node-sets ("physical lines", i.e. boundary edges) and named
//! element-sets ("physical surfaces", i.e. material domains). The engine
//! never parses a mesh file itself; it only consumes this struct.

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};

/// Parsed mesh data, independent of any file format.
#[derive(Debug, Clone, Default)]
pub struct MeshInput {
    /// Node coordinates, (x, y, z) per node, indexed 0..n.
    pub nodes: Vec<[f64; 3]>,
    /// Triangle connectivity, 0-based node indices.
    pub triangles: Vec<[usize; 3]>,
    /// Named sets of boundary node indices ("physical lines").
    pub node_sets: HashMap<String, Vec<usize>>,
    /// Named sets of element indices ("physical surfaces").
    pub elem_sets: HashMap<String, Vec<usize>>,
}

impl MeshInput {
    pub fn node_set(&self, name: &str) -> MeshResult<&[usize]> {
        self.node_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownBoundary {
                name: name.to_string(),
            })
    }

    pub fn elem_set(&self, name: &str) -> MeshResult<&[usize]> {
        self.elem_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownDomain {
                name: name.to_string(),
            })
    }
}

/// Implemented by an external mesh reader (e.g. an MSH v4 ASCII parser).
/// Out of scope for this crate: only the interface is specified here.
pub trait MeshSource {
    fn load(&self) -> MeshResult<MeshInput>;
}
