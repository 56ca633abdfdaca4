//! # tensa-types
//!
//! Shared types, identifiers, error types and numeric constants
//! for the Tensa shape-optimization engine.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other Tensa crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{Degeneracy, TensaError, TensaResult};
pub use ids::{ConstraintId, ForceId};
