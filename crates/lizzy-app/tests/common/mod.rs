//! Shared mesh fixtures for the scenario tests (spec §8): a structured
//! rectangle for channel flow, and a structured annulus for the
//! anisotropic/rotated radial scenarios.

use std::collections::HashMap;
use std::f64::consts::PI;

use lizzy_mesh::MeshInput;

/// A regular `nx` x `ny` grid of right triangles over
/// `[0, length] x [0, height]`, with node-sets `left_edge`/`right_edge`
/// and one element-set `"all"` covering every triangle. This is the
/// "Rect = the 1x0.5 m rectangle mesh" fixture spec §8 refers to.
pub fn rect_mesh(length: f64, height: f64, nx: usize, ny: usize) -> MeshInput {
    let node_index = |i: usize, j: usize| -> usize { j * (nx + 1) + i };
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let x = length * (i as f64) / (nx as f64);
            let y = height * (j as f64) / (ny as f64);
            nodes.push([x, y, 0.0]);
        }
    }

    let mut triangles = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let a = node_index(i, j);
            let b = node_index(i + 1, j);
            let c = node_index(i + 1, j + 1);
            let d = node_index(i, j + 1);
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }

    let left_edge: Vec<usize> = (0..=ny).map(|j| node_index(0, j)).collect();
    let right_edge: Vec<usize> = (0..=ny).map(|j| node_index(nx, j)).collect();

    let mut node_sets = HashMap::new();
    node_sets.insert("left_edge".to_string(), left_edge);
    node_sets.insert("right_edge".to_string(), right_edge);

    let mut elem_sets = HashMap::new();
    elem_sets.insert("all".to_string(), (0..triangles.len()).collect());

    MeshInput {
        nodes,
        triangles,
        node_sets,
        elem_sets,
    }
}

/// A structured annulus between `r_inner` and `r_outer`, `n_theta`
/// divisions around and `n_r` divisions radially. Node-sets
/// `inner_edge`/`outer_edge`, one element-set `"all"`.
pub fn annulus_mesh(r_inner: f64, r_outer: f64, n_theta: usize, n_r: usize) -> MeshInput {
    let node_index = |i: usize, j: usize| -> usize { j * n_theta + (i % n_theta) };
    let mut nodes = Vec::with_capacity(n_theta * (n_r + 1));
    for j in 0..=n_r {
        let r = r_inner + (r_outer - r_inner) * (j as f64) / (n_r as f64);
        for i in 0..n_theta {
            let theta = 2.0 * PI * (i as f64) / (n_theta as f64);
            nodes.push([r * theta.cos(), r * theta.sin(), 0.0]);
        }
    }

    let mut triangles = Vec::with_capacity(2 * n_theta * n_r);
    for j in 0..n_r {
        for i in 0..n_theta {
            let a = node_index(i, j);
            let b = node_index(i + 1, j);
            let c = node_index(i + 1, j + 1);
            let d = node_index(i, j + 1);
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }

    let inner_edge: Vec<usize> = (0..n_theta).map(|i| node_index(i, 0)).collect();
    let outer_edge: Vec<usize> = (0..n_theta).map(|i| node_index(i, n_r)).collect();

    let mut node_sets = HashMap::new();
    node_sets.insert("inner_edge".to_string(), inner_edge);
    node_sets.insert("outer_edge".to_string(), outer_edge);

    let mut elem_sets = HashMap::new();
    elem_sets.insert("all".to_string(), (0..triangles.len()).collect());

    MeshInput {
        nodes,
        triangles,
        node_sets,
        elem_sets,
    }
}
