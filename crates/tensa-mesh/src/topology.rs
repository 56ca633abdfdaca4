//! Mesh topology queries.
//!
//! Builds adjacency data from the face lists, giving the solver's callers
//! what they need to register constraints:
//! - unique edges (strain constraints)
//! - boundary vertices (anchors)
//! - interior hinges between adjacent triangles (bending constraints)

use std::collections::BTreeMap;

use crate::mesh::PolyMesh;

/// Precomputed topology information for a polygon mesh.
///
/// Built once after the mesh is constructed. Edge and hinge order is
/// deterministic (sorted by vertex pair).
#[derive(Debug, Clone)]
pub struct Topology {
    /// For each vertex, the faces that contain it.
    pub vertex_faces: Vec<Vec<usize>>,

    /// Unique polygon edges as `[v_min, v_max]` pairs.
    pub edges: Vec<[usize; 2]>,

    /// For each edge, the faces that use it.
    /// Boundary edges have exactly 1 adjacent face.
    pub edge_faces: Vec<Vec<usize>>,

    /// Triangle pairs sharing an edge, after fan-triangulating every face.
    pub hinges: Vec<Hinge>,
}

/// Two triangles sharing an edge.
///
/// ```text
///        wa
///       / \
///      /   \
///    v0 ─── v1
///      \   /
///       \ /
///        wb
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hinge {
    /// Shared edge vertex A.
    pub v0: usize,
    /// Shared edge vertex B.
    pub v1: usize,
    /// The vertex of the first triangle not on the edge.
    pub wing_a: usize,
    /// The vertex of the second triangle not on the edge.
    pub wing_b: usize,
}

impl Hinge {
    /// Indices in the order bending constraints expect: edge first, then wings.
    pub fn indices(&self) -> [usize; 4] {
        [self.v0, self.v1, self.wing_a, self.wing_b]
    }
}

impl Topology {
    /// Build topology from a polygon mesh.
    pub fn build(mesh: &PolyMesh) -> Self {
        let vertex_count = mesh.vertex_count();

        let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
        for (f, face) in mesh.faces.iter().enumerate() {
            for &v in face {
                vertex_faces[v].push(f);
            }
        }

        // Polygon edges, keyed by (min_vertex, max_vertex)
        let mut edge_map: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (f, face) in mesh.faces.iter().enumerate() {
            for k in 0..face.len() {
                let (a, b) = (face[k], face[(k + 1) % face.len()]);
                edge_map.entry(ordered(a, b)).or_default().push(f);
            }
        }

        let mut edges = Vec::with_capacity(edge_map.len());
        let mut edge_faces = Vec::with_capacity(edge_map.len());
        for ((v0, v1), faces) in edge_map {
            edges.push([v0, v1]);
            edge_faces.push(faces);
        }

        // Triangle edges for hinges
        let triangles = mesh.triangles();
        let mut tri_edge_map: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (t, tri) in triangles.iter().enumerate() {
            for k in 0..3 {
                tri_edge_map
                    .entry(ordered(tri[k], tri[(k + 1) % 3]))
                    .or_default()
                    .push(t);
            }
        }

        let hinges = tri_edge_map
            .into_iter()
            .filter(|(_, tris)| tris.len() == 2)
            .map(|((v0, v1), tris)| Hinge {
                v0,
                v1,
                wing_a: find_wing_vertex(&triangles[tris[0]], v0, v1),
                wing_b: find_wing_vertex(&triangles[tris[1]], v0, v1),
            })
            .collect();

        Self {
            vertex_faces,
            edges,
            edge_faces,
            hinges,
        }
    }

    /// Returns the number of boundary edges (edges with only 1 adjacent face).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_faces.iter().filter(|faces| faces.len() == 1).count()
    }

    /// Vertices on at least one boundary edge, sorted ascending.
    pub fn boundary_vertices(&self) -> Vec<usize> {
        let mut verts: Vec<usize> = self
            .edges
            .iter()
            .zip(&self.edge_faces)
            .filter(|(_, faces)| faces.len() == 1)
            .flat_map(|(edge, _)| edge.iter().copied())
            .collect();
        verts.sort_unstable();
        verts.dedup();
        verts
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}

#[inline]
fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Find the vertex of `tri` that is not v0 or v1 (the "wing" vertex).
fn find_wing_vertex(tri: &[usize; 3], v0: usize, v1: usize) -> usize {
    tri.iter()
        .copied()
        .find(|&v| v != v0 && v != v1)
        .unwrap_or(tri[2])
}
