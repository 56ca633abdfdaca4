//! Strongly-typed identifiers.
//!
//! Newtype handles keep constraint and force registrations from being
//! mixed up at call sites. Vertices stay plain `usize` column indices.

use serde::{Deserialize, Serialize};

/// Handle returned when a constraint is registered with a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub u32);

/// Handle returned when a force is registered with a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForceId(pub u32);

impl ConstraintId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ForceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
