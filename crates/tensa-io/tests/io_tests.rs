//! Integration tests for tensa-io.

use tensa_math::{DVec3, PointSet};
use tensa_mesh::generators::{grid, GridFaces, GridPlane};
use tensa_io::obj::{save_obj, write_mesh_obj, write_obj};
use tensa_types::TensaError;

fn triangle() -> PointSet {
    PointSet::from_points(&[DVec3::ZERO, DVec3::new(1.5, 0.0, 0.0), DVec3::new(0.0, 1.0, -2.25)])
}

fn to_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

// ─── OBJ Writer Tests ─────────────────────────────────────────

#[test]
fn writes_vertices_then_one_indexed_faces() {
    let mut out = Vec::new();
    write_obj(&mut out, &triangle(), &[vec![0, 1, 2]], &[]).unwrap();
    assert_eq!(to_string(out), "v 0 0 0\nv 1.5 0 0\nv 0 1 -2.25\nf 1 2 3\n");
}

#[test]
fn header_lines_become_comments() {
    let mut out = Vec::new();
    write_obj(&mut out, &triangle(), &[], &["tensile structure", "iterations: 10"]).unwrap();
    let text = to_string(out);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("# tensile structure"));
    assert_eq!(lines.next(), Some("# iterations: 10"));
    assert_eq!(lines.next(), Some("v 0 0 0"));
}

#[test]
fn points_without_faces() {
    let mut out = Vec::new();
    write_obj(&mut out, &triangle(), &[], &[]).unwrap();
    let text = to_string(out);
    assert_eq!(text.lines().count(), 3);
    assert!(!text.contains('f'));
}

#[test]
fn coordinates_round_trip_exactly() {
    let p = DVec3::new(0.1 + 0.2, -1.0 / 3.0, 1e-17);
    let mut out = Vec::new();
    write_obj(&mut out, &PointSet::from_points(&[p]), &[], &[]).unwrap();

    let text = to_string(out);
    let coords: Vec<f64> = text
        .split_whitespace()
        .skip(1)
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(coords, vec![p.x, p.y, p.z]);
}

#[test]
fn rejects_face_with_missing_vertex() {
    let mut out = Vec::new();
    let result = write_obj(&mut out, &triangle(), &[vec![0, 1, 3]], &[]);
    assert!(matches!(result, Err(TensaError::InvalidMesh(_))));
    assert!(out.is_empty());
}

#[test]
fn mesh_writer_keeps_quads() {
    let mesh = grid(3, 2, 1.0, GridPlane::Xz, GridFaces::Quads);
    let mut out = Vec::new();
    write_mesh_obj(&mut out, &mesh, &[]).unwrap();

    let text = to_string(out);
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 6);
    let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0].split_whitespace().count(), 5);
}

#[test]
fn save_obj_writes_file() {
    let path = std::env::temp_dir().join(format!("tensa_io_test_{}.obj", std::process::id()));
    save_obj(&path, &triangle(), &[vec![0, 1, 2]], &["saved"]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(text.starts_with("# saved\nv 0 0 0\n"));
    assert!(text.ends_with("f 1 2 3\n"));
}

#[test]
fn save_obj_reports_io_error() {
    let path = std::env::temp_dir().join("tensa_missing_dir").join("nested").join("out.obj");
    let result = save_obj(&path, &triangle(), &[], &[]);
    assert!(matches!(result, Err(TensaError::Io(_))));
}
