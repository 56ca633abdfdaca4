//! Error types for the Tensa engine.
//!
//! All crates return `TensaResult<T>` from fallible operations.
//! Local geometric degeneracy is reported separately through
//! [`Degeneracy`] because it is transient and never aborts a solve.

use thiserror::Error;

/// Unified error type for the Tensa engine.
#[derive(Debug, Error)]
pub enum TensaError {
    /// A constraint, force or face references a vertex outside the point set.
    #[error("Vertex index {index} out of range (point count: {count})")]
    InvalidIndex { index: usize, count: usize },

    /// A constructor or setter received an unusable value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// `initialize` was called with nothing to assemble.
    #[error("No constraints registered")]
    NoConstraints,

    /// A static system has a vertex whose absolute position nothing pins down.
    #[error("System is under-constrained: vertex {vertex} is not anchored")]
    UnderConstrained { vertex: usize },

    /// Sparse Cholesky factorization failed (matrix not positive-definite).
    #[error("Factorization failed: {0}")]
    Factorization(String),

    /// `solve` was called before a successful `initialize`.
    #[error("Solver not initialized. Call initialize() first.")]
    NotInitialized,

    /// Constraints or weights changed after `initialize`.
    #[error("System matrix is stale: {0}. Call initialize() again.")]
    StaleSystem(&'static str),

    /// The global step failed after factorization.
    #[error("Linear solve failed: {0}")]
    LinearSolve(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, TensaError>`.
pub type TensaResult<T> = Result<T, TensaError>;

/// Why a constraint could not project the current geometry.
///
/// The solver substitutes a neutral target for the affected constraint
/// and carries on with the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Degeneracy {
    #[error("edge has zero length")]
    ZeroLengthEdge,

    #[error("triangle has zero area")]
    ZeroAreaTriangle,

    #[error("bending hinge edge has zero length")]
    ZeroLengthHinge,

    #[error("bending wing lies on the hinge line")]
    CoincidentWings,

    #[error("points are collinear, no unique circle")]
    CollinearPoints,
}
