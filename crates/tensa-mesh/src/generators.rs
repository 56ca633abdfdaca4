//! Procedural grid generators for scenarios and testing.
//!
//! Grids are laid out row-major: vertex `(x, y)` has id `y * cols + x`.

use serde::{Deserialize, Serialize};
use tensa_math::{DVec3, PointSet};

use crate::mesh::PolyMesh;

/// Which coordinate plane a grid is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPlane {
    /// Columns along X, rows along Y, Z = 0.
    #[default]
    Xy,
    /// Columns along X, rows along Z, Y = 0.
    Xz,
}

/// Face layout for grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridFaces {
    /// One quad per cell.
    #[default]
    Quads,
    /// Two triangles per cell, split along the (x, y)–(x+1, y+1) diagonal.
    Triangles,
}

/// Row-major id of grid vertex `(x, y)`.
#[inline]
pub fn grid_index(cols: usize, x: usize, y: usize) -> usize {
    y * cols + x
}

/// Generates a flat `cols × rows` vertex grid with the given spacing.
///
/// The grid starts at the origin and grows along the positive axes.
///
/// # Example
/// ```
/// use tensa_mesh::generators::{grid, GridFaces, GridPlane};
/// let mesh = grid(3, 3, 1.0, GridPlane::Xy, GridFaces::Quads);
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.face_count(), 4);
/// ```
pub fn grid(cols: usize, rows: usize, spacing: f64, plane: GridPlane, faces: GridFaces) -> PolyMesh {
    let mut positions = PointSet::with_capacity(cols * rows);
    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = (x as f64 * spacing, y as f64 * spacing);
            positions.push(match plane {
                GridPlane::Xy => DVec3::new(u, v, 0.0),
                GridPlane::Xz => DVec3::new(u, 0.0, v),
            });
        }
    }

    let cells = cols.saturating_sub(1) * rows.saturating_sub(1);
    let mut face_list = Vec::with_capacity(cells * 2);
    for y in 0..rows.saturating_sub(1) {
        for x in 0..cols.saturating_sub(1) {
            let i00 = grid_index(cols, x, y);
            let i10 = grid_index(cols, x + 1, y);
            let i11 = grid_index(cols, x + 1, y + 1);
            let i01 = grid_index(cols, x, y + 1);
            match faces {
                GridFaces::Quads => face_list.push(vec![i00, i10, i11, i01]),
                GridFaces::Triangles => {
                    face_list.push(vec![i00, i10, i11]);
                    face_list.push(vec![i00, i11, i01]);
                }
            }
        }
    }

    PolyMesh {
        positions,
        faces: face_list,
    }
}

/// Horizontal and vertical neighbor pairs of a `cols × rows` grid.
pub fn grid_edges(cols: usize, rows: usize) -> Vec<[usize; 2]> {
    let mut edges = Vec::new();
    for y in 0..rows {
        for x in 0..cols.saturating_sub(1) {
            edges.push([grid_index(cols, x, y), grid_index(cols, x + 1, y)]);
        }
    }
    for y in 0..rows.saturating_sub(1) {
        for x in 0..cols {
            edges.push([grid_index(cols, x, y), grid_index(cols, x, y + 1)]);
        }
    }
    edges
}

/// Both diagonals of every grid cell (shear bracing).
pub fn grid_diagonals(cols: usize, rows: usize) -> Vec<[usize; 2]> {
    let mut edges = Vec::new();
    for y in 0..rows.saturating_sub(1) {
        for x in 0..cols.saturating_sub(1) {
            edges.push([grid_index(cols, x, y), grid_index(cols, x + 1, y + 1)]);
            edges.push([grid_index(cols, x + 1, y), grid_index(cols, x, y + 1)]);
        }
    }
    edges
}
