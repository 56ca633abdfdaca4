//! # tensa-solver
//!
//! Local-global shape optimization: constraints, forces and the solver
//! that balances them.
//!
//! ## Key Types
//!
//! - [`ShapeSolver`] — Owns points, constraints and forces; runs `solve`
//! - [`Constraint`] — Projection + linear stencil capability
//! - [`Force`] — External force capability
//! - [`SolverConfig`] — Dynamic-mode parameters and early-exit tolerance
//! - [`SolveReport`] — Per-call statistics

pub mod assembly;
pub mod config;
pub mod constraint;
pub mod force;
pub mod solver;

pub use config::SolverConfig;
pub use constraint::{
    AreaConstraint, BendingConstraint, CircleConstraint, ClosenessConstraint, Constraint,
    EdgeStrainConstraint, Stencil,
};
pub use force::{Force, GravityForce, NormalForce, VertexForce};
pub use solver::{ShapeSolver, SolveReport};
