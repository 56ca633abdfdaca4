//! # tensa-mesh
//!
//! Polygon mesh representation and topology helpers that feed the solver:
//! grids to form-find, boundary vertices to anchor, edges for strain
//! constraints, triangles for area constraints and hinges for bending.
//!
//! ## Key Types
//!
//! - [`PolyMesh`] — Positions (a [`tensa_math::PointSet`]) plus polygon faces.
//! - [`Topology`] — Unique edges, boundary detection and bending hinges.
//! - Procedural grid generators for scenarios and tests.

pub mod generators;
pub mod mesh;
pub mod topology;

pub use mesh::PolyMesh;
pub use topology::Topology;
