//! # tensa-math
//!
//! Linear algebra primitives for the Tensa shape optimizer.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`DVec3`, `DMat3`)
//! - [`PointSet`], the 3×N point matrix stored per coordinate channel
//! - Sparse matrix representation (CSR) and Cholesky solver interface
//! - Least-squares plane and circle fits used by circularity projection

pub mod faer_solver;
pub mod fit;
pub mod points;
pub mod sparse;

pub use points::PointSet;

// Re-export glam types as the canonical math types for Tensa.
pub use glam::{DMat3, DVec3};
