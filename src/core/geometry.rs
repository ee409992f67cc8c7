use crate::domain::model::{GeometryResult, IndexedMesh};
use std::collections::HashSet;

/// Undirected edges of a triangle list, each as `[low, high]`, in order of
/// first appearance.
pub fn unique_edges(faces: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::with_capacity(faces.len() * 3 / 2);
    let mut edges = Vec::with_capacity(faces.len() * 3 / 2);

    for &[a, b, c] in faces {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let edge = [u.min(v), u.max(v)];
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    edges
}

impl GeometryResult {
    pub fn from_mesh(mesh: IndexedMesh) -> Self {
        let edges = unique_edges(&mesh.faces);
        Self {
            vertices: mesh.vertices,
            faces: mesh.faces,
            edges,
        }
    }
}
