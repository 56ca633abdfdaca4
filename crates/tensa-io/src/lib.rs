//! # tensa-io
//!
//! Geometry export for optimized shapes.
//!
//! Writes point sets and their polygon faces as Wavefront OBJ, the
//! format downstream modelling tools read directly.

pub mod obj;

pub use obj::{save_mesh_obj, save_obj, write_mesh_obj, write_obj};
