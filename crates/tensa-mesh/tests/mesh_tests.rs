//! Integration tests for tensa-mesh.

use tensa_math::{DVec3, PointSet};
use tensa_mesh::generators::{grid, grid_diagonals, grid_edges, grid_index, GridFaces, GridPlane};
use tensa_mesh::topology::Topology;
use tensa_mesh::PolyMesh;
use tensa_types::TensaError;

// ─── PolyMesh Tests ───────────────────────────────────────────

fn make_single_triangle() -> PolyMesh {
    PolyMesh {
        positions: PointSet::from_points(&[DVec3::ZERO, DVec3::X, DVec3::Y]),
        faces: vec![vec![0, 1, 2]],
    }
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.position(1), DVec3::X);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = make_single_triangle();
    mesh.faces[0][2] = 99;
    assert!(matches!(mesh.validate(), Err(TensaError::InvalidMesh(_))));
}

#[test]
fn validate_catches_short_face() {
    let mut mesh = make_single_triangle();
    mesh.faces.push(vec![0, 1]);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_repeated_vertex() {
    let mut mesh = make_single_triangle();
    mesh.faces[0] = vec![0, 1, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn new_rejects_invalid_faces() {
    let positions = PointSet::zeros(3);
    assert!(PolyMesh::new(positions, vec![vec![0, 1, 3]]).is_err());
}

#[test]
fn set_positions_checks_count() {
    let mut mesh = make_single_triangle();
    assert!(mesh.set_positions(PointSet::zeros(2)).is_err());
    assert!(mesh.set_positions(PointSet::zeros(3)).is_ok());
}

#[test]
fn mesh_serialization() {
    let mesh = make_single_triangle();
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: PolyMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.faces, mesh.faces);
    assert_eq!(recovered.positions, mesh.positions);
}

#[test]
fn grid_options_use_snake_case() {
    assert_eq!(serde_json::to_string(&GridPlane::Xz).unwrap(), "\"xz\"");
    let faces: GridFaces = serde_json::from_str("\"triangles\"").unwrap();
    assert_eq!(faces, GridFaces::Triangles);
}

#[test]
fn triangulate_quad_fan() {
    let mesh = grid(2, 2, 1.0, GridPlane::Xy, GridFaces::Quads);
    assert_eq!(mesh.triangles(), vec![[0, 1, 3], [0, 3, 2]]);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn grid_counts() {
    let quads = grid(4, 3, 0.5, GridPlane::Xy, GridFaces::Quads);
    assert_eq!(quads.vertex_count(), 12);
    assert_eq!(quads.face_count(), 6);
    assert!(quads.validate().is_ok());

    let tris = grid(4, 3, 0.5, GridPlane::Xy, GridFaces::Triangles);
    assert_eq!(tris.face_count(), 12);
    assert!(tris.faces.iter().all(|f| f.len() == 3));
}

#[test]
fn grid_positions_follow_plane() {
    let xy = grid(3, 2, 2.0, GridPlane::Xy, GridFaces::Quads);
    assert_eq!(xy.position(grid_index(3, 2, 1)), DVec3::new(4.0, 2.0, 0.0));

    let xz = grid(3, 2, 2.0, GridPlane::Xz, GridFaces::Quads);
    assert_eq!(xz.position(grid_index(3, 2, 1)), DVec3::new(4.0, 0.0, 2.0));
}

#[test]
fn grid_edge_lists() {
    // 3×3 grid: 2 per row × 3 rows + 3 per column gap × 2 gaps = 12
    assert_eq!(grid_edges(3, 3).len(), 12);
    // 2×2 cells × 2 diagonals
    assert_eq!(grid_diagonals(3, 3).len(), 8);
    assert!(grid_edges(3, 3).contains(&[0, 1]));
    assert!(grid_edges(3, 3).contains(&[0, 3]));
}

#[test]
fn degenerate_grid_has_no_faces() {
    let mesh = grid(1, 5, 1.0, GridPlane::Xy, GridFaces::Quads);
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(mesh.face_count(), 0);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn topology_quad_grid_edges() {
    let mesh = grid(3, 3, 1.0, GridPlane::Xy, GridFaces::Quads);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.edges.len(), 12);
    assert_eq!(topo.boundary_edge_count(), 8);
    assert!(!topo.is_closed());
}

#[test]
fn topology_boundary_vertices() {
    let mesh = grid(3, 3, 1.0, GridPlane::Xy, GridFaces::Quads);
    let topo = Topology::build(&mesh);
    // Everything but the center vertex (id 4)
    assert_eq!(topo.boundary_vertices(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
}

#[test]
fn topology_vertex_faces() {
    let mesh = grid(3, 3, 1.0, GridPlane::Xy, GridFaces::Quads);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.vertex_faces[4].len(), 4);
    assert_eq!(topo.vertex_faces[0].len(), 1);
}

#[test]
fn topology_hinges_of_two_triangles() {
    let mesh = PolyMesh {
        positions: PointSet::from_points(&[
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(0.5, 1.0, 0.0),
            DVec3::new(0.5, -1.0, 0.0),
        ]),
        faces: vec![vec![0, 1, 2], vec![1, 0, 3]],
    };
    let topo = Topology::build(&mesh);
    assert_eq!(topo.hinges.len(), 1);
    let hinge = topo.hinges[0];
    assert_eq!((hinge.v0, hinge.v1), (0, 1));
    assert_eq!(hinge.indices(), [0, 1, 2, 3]);
}

#[test]
fn topology_triangle_grid_hinges() {
    // 2×2 cells, 8 triangles: interior triangle edges = 16 total - 8 boundary = 8
    let mesh = grid(3, 3, 1.0, GridPlane::Xy, GridFaces::Triangles);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.hinges.len(), 8);
    for h in &topo.hinges {
        assert_ne!(h.wing_a, h.wing_b);
    }
}
