//! Polygon mesh: a point set plus faces that index into it.
//!
//! Positions are kept in the same SoA [`PointSet`] the solver optimizes,
//! so a mesh hands its points to the solver and takes the optimized
//! result back without conversion.

use serde::{Deserialize, Serialize};
use tensa_math::{DVec3, PointSet};
use tensa_types::{TensaError, TensaResult};

/// A polygon mesh with per-face vertex lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolyMesh {
    /// Vertex positions, column index = vertex id.
    pub positions: PointSet,
    /// Faces as ordered vertex-index polygons (≥ 3 vertices each).
    pub faces: Vec<Vec<usize>>,
}

impl PolyMesh {
    /// Creates a mesh from positions and faces, validating indices.
    pub fn new(positions: PointSet, faces: Vec<Vec<usize>>) -> TensaResult<Self> {
        let mesh = Self { positions, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> DVec3 {
        self.positions.point(i)
    }

    /// Replaces all positions, e.g. with a solver result.
    pub fn set_positions(&mut self, positions: PointSet) -> TensaResult<()> {
        if positions.len() != self.vertex_count() {
            return Err(TensaError::InvalidMesh(format!(
                "Position count ({}) != vertex count ({})",
                positions.len(),
                self.vertex_count()
            )));
        }
        self.positions = positions;
        Ok(())
    }

    /// Splits every face into a triangle fan anchored at its first vertex.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut tris = Vec::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            for k in 1..face.len().saturating_sub(1) {
                tris.push([face[0], face[k], face[k + 1]]);
            }
        }
        tris
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Every face has at least 3 vertices
    /// - Face indices are within bounds
    /// - No face repeats a vertex
    pub fn validate(&self) -> TensaResult<()> {
        let n = self.vertex_count();
        for (f, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(TensaError::InvalidMesh(format!(
                    "Face {} has {} vertices, expected at least 3",
                    f,
                    face.len()
                )));
            }
            if let Some(&idx) = face.iter().find(|&&i| i >= n) {
                return Err(TensaError::InvalidMesh(format!(
                    "Face {} references vertex {} (vertex count: {})",
                    f, idx, n
                )));
            }
            for (k, &a) in face.iter().enumerate() {
                if face[k + 1..].contains(&a) {
                    return Err(TensaError::InvalidMesh(format!(
                        "Face {} repeats vertex {}",
                        f, a
                    )));
                }
            }
        }
        Ok(())
    }
}
