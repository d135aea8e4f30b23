//! The global stiffness matrix's structural nonzero pattern, captured
//! once at `initialise_solver` from the CVMesh's node adjacency (the
//! spec §4.2 sparsity pattern) and reused, unchanged, for every step's
//! assembly (§4.5 invariant: "sparsity pattern is identical between
//! steps, no reallocation").

use lizzy_core::{NodeId, Real};
use lizzy_mesh::CVMesh;

/// Row-major CSR-style index of a symmetric sparsity pattern. Every
/// row includes its own diagonal entry even where Dirichlet
/// elimination will later overwrite it with 1.
#[derive(Debug, Clone)]
pub struct SparsityPattern {
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    dim: usize,
}

impl SparsityPattern {
    pub fn build(cv: &CVMesh) -> Self {
        let dim = cv.node_count();
        let mut row_ptr = Vec::with_capacity(dim + 1);
        let mut col_idx = Vec::new();
        row_ptr.push(0);
        for i in 0..dim {
            let node = NodeId::from_index(i as u32);
            let mut row: Vec<usize> = cv.neighbours(node).iter().map(|n| n.idx()).collect();
            row.push(i);
            row.sort_unstable();
            row.dedup();
            col_idx.extend_from_slice(&row);
            row_ptr.push(col_idx.len());
        }
        Self { row_ptr, col_idx, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    pub fn row(&self, i: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]]
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Position of `(row, col)` within the flat `col_idx`/values array,
    /// or `None` if that structural entry does not exist.
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        let slice = self.row(row);
        slice
            .binary_search(&col)
            .ok()
            .map(|pos| self.row_ptr[row] + pos)
    }
}

/// A value array aligned with a [`SparsityPattern`], plus the
/// right-hand side. This is what [`crate::assembler::LinearAssembler`]
/// produces each step, and what every [`crate::backend::LinearBackend`]
/// consumes.
#[derive(Debug, Clone)]
pub struct AssembledSystem<'p> {
    pub pattern: &'p SparsityPattern,
    pub values: Vec<Real>,
    pub b: Vec<Real>,
}

impl<'p> AssembledSystem<'p> {
    pub fn dense(&self) -> nalgebra::DMatrix<Real> {
        let n = self.pattern.dim();
        let mut m = nalgebra::DMatrix::zeros(n, n);
        for row in 0..n {
            for (pos, &col) in self.pattern.row(row).iter().enumerate() {
                m[(row, col)] = self.values[self.pattern.row_ptr()[row] + pos];
            }
        }
        m
    }

    pub fn to_sprs(&self) -> sprs::CsMat<Real> {
        sprs::CsMat::new(
            (self.pattern.dim(), self.pattern.dim()),
            self.pattern.row_ptr().to_vec(),
            self.pattern.col_idx().to_vec(),
            self.values.clone(),
        )
    }
}
