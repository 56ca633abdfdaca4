//! Wavefront OBJ writer.
//!
//! Output layout:
//!
//! ```text
//! # optional header lines
//! v x y z        (one per point, in column order)
//! f a b c ...    (one per face, 1-indexed)
//! ```
//!
//! Coordinates use Rust's shortest round-trip float formatting, so a
//! reader recovers the exact values.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tensa_math::PointSet;
use tensa_mesh::PolyMesh;
use tensa_types::{TensaError, TensaResult};
use tracing::debug;

/// Writes `points` and `faces` as OBJ text.
///
/// Every `header` line is emitted as a `#` comment before the vertices.
/// Fails with [`TensaError::InvalidMesh`] before writing anything if a
/// face references a missing point.
pub fn write_obj<W: Write>(
    mut writer: W,
    points: &PointSet,
    faces: &[Vec<usize>],
    header: &[&str],
) -> TensaResult<()> {
    let count = points.len();
    for (f, face) in faces.iter().enumerate() {
        if let Some(&v) = face.iter().find(|&&v| v >= count) {
            return Err(TensaError::InvalidMesh(format!(
                "Face {f} references vertex {v}, but only {count} points exist"
            )));
        }
    }

    for line in header {
        writeln!(writer, "# {line}")?;
    }

    for p in points.iter() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for face in faces {
        write!(writer, "f")?;
        for &v in face {
            write!(writer, " {}", v + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a polygon mesh as OBJ text.
pub fn write_mesh_obj<W: Write>(writer: W, mesh: &PolyMesh, header: &[&str]) -> TensaResult<()> {
    write_obj(writer, &mesh.positions, &mesh.faces, header)
}

/// Saves `points` and `faces` to an OBJ file at `path`.
pub fn save_obj<P: AsRef<Path>>(
    path: P,
    points: &PointSet,
    faces: &[Vec<usize>],
    header: &[&str],
) -> TensaResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_obj(BufWriter::new(file), points, faces, header)?;
    debug!(
        path = %path.display(),
        points = points.len(),
        faces = faces.len(),
        "wrote OBJ"
    );
    Ok(())
}

/// Saves a polygon mesh to an OBJ file at `path`.
pub fn save_mesh_obj<P: AsRef<Path>>(path: P, mesh: &PolyMesh, header: &[&str]) -> TensaResult<()> {
    save_obj(path, &mesh.positions, &mesh.faces, header)
}
