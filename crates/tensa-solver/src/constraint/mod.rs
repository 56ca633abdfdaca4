//! Constraint capability and the five geometric constraint variants.
//!
//! Every constraint owns a small fixed list of vertex indices and a weight.
//! It contributes two things to the local-global solver:
//!
//! - a **projection** onto its feasible set, evaluated every sweep
//!   (the local step)
//! - a constant linear **stencil** `S`, scaled by √weight and stacked into
//!   the global operator once during `initialize`
//!
//! Each constraint adds `w · ‖S·x − S·p‖²` to the energy, where `p` is the
//! projection of the current positions.

mod area;
mod bending;
mod circle;
mod closeness;
mod edge_strain;

pub use area::AreaConstraint;
pub use bending::BendingConstraint;
pub use circle::CircleConstraint;
pub use closeness::ClosenessConstraint;
pub use edge_strain::EdgeStrainConstraint;

use std::any::Any;
use std::fmt::Debug;

use tensa_math::{DVec3, PointSet};
use tensa_types::{Degeneracy, TensaError, TensaResult};

/// Linear operator shape shared by a family of constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stencil {
    /// One row per index selecting that point. Pins absolute position.
    Identity,
    /// `k − 1` rows of consecutive differences `p[r+1] − p[r]`.
    Difference,
    /// `k` rows of `p[r] − mean(p)`. Invariant to translation.
    MeanCentered,
}

impl Stencil {
    /// Number of operator rows for a constraint over `k` points.
    pub fn rows(self, k: usize) -> usize {
        match self {
            Stencil::Identity | Stencil::MeanCentered => k,
            Stencil::Difference => k.saturating_sub(1),
        }
    }

    /// Operator entry at `(row, col)` for a constraint over `k` points.
    pub fn coefficient(self, k: usize, row: usize, col: usize) -> f64 {
        match self {
            Stencil::Identity => {
                if row == col {
                    1.0
                } else {
                    0.0
                }
            }
            Stencil::Difference => {
                if col == row {
                    -1.0
                } else if col == row + 1 {
                    1.0
                } else {
                    0.0
                }
            }
            Stencil::MeanCentered => {
                let diag = if row == col { 1.0 } else { 0.0 };
                diag - 1.0 / k as f64
            }
        }
    }

    /// Writes `S · points` into `out` (`rows(points.len())` entries).
    pub fn apply(self, points: &[DVec3], out: &mut [DVec3]) {
        match self {
            Stencil::Identity => out.copy_from_slice(points),
            Stencil::Difference => {
                for (slot, pair) in out.iter_mut().zip(points.windows(2)) {
                    *slot = pair[1] - pair[0];
                }
            }
            Stencil::MeanCentered => {
                let mean = tensa_math::fit::centroid(points);
                for (slot, &p) in out.iter_mut().zip(points) {
                    *slot = p - mean;
                }
            }
        }
    }

    /// Returns true if this stencil fixes absolute position, not just shape.
    pub fn anchors(self) -> bool {
        matches!(self, Stencil::Identity)
    }
}

/// A local geometric constraint.
///
/// Implementors are registered with [`crate::ShapeSolver::add_constraint`],
/// which takes ownership.
pub trait Constraint: Debug + Send {
    /// Short variant name, used in logs.
    fn name(&self) -> &'static str;

    /// Vertex indices this constraint reads and moves.
    fn indices(&self) -> &[usize];

    /// Current weight.
    fn weight(&self) -> f64;

    /// Sets the weight. Must be positive and finite.
    fn set_weight(&mut self, weight: f64) -> TensaResult<()>;

    /// Linear operator applied to both the unknowns and the projection.
    fn stencil(&self) -> Stencil;

    /// Projects the constraint's points onto its feasible set.
    ///
    /// `target` holds one slot per index. On error its contents are
    /// unspecified and the caller substitutes the current positions.
    fn project(&self, points: &PointSet, target: &mut [DVec3]) -> Result<(), Degeneracy>;

    /// Appends `√w · S` as `(row, col, value)` triplets starting at `*row`,
    /// then advances `*row` past the rows written.
    fn add_to_system(&self, triplets: &mut Vec<(usize, usize, f64)>, row: &mut usize) {
        let scale = self.weight().sqrt();
        let stencil = self.stencil();
        let indices = self.indices();
        let k = indices.len();
        let rows = stencil.rows(k);
        for r in 0..rows {
            for (c, &vertex) in indices.iter().enumerate() {
                let coef = stencil.coefficient(k, r, c);
                if coef != 0.0 {
                    triplets.push((*row + r, vertex, scale * coef));
                }
            }
        }
        *row += rows;
    }

    /// Number of operator rows this constraint contributes.
    fn rows(&self) -> usize {
        self.stencil().rows(self.indices().len())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Index list and weight shared by every variant.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConstraintCore {
    pub indices: Vec<usize>,
    pub weight: f64,
}

/// Required index count for a variant.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl ConstraintCore {
    /// Validates indices (count, range, distinctness) and weight.
    pub fn new(
        name: &str,
        indices: &[usize],
        arity: Arity,
        weight: f64,
        points: &PointSet,
    ) -> TensaResult<Self> {
        let count_ok = match arity {
            Arity::Exactly(n) => indices.len() == n,
            Arity::AtLeast(n) => indices.len() >= n,
        };
        if !count_ok {
            let expected = match arity {
                Arity::Exactly(n) => format!("exactly {n}"),
                Arity::AtLeast(n) => format!("at least {n}"),
            };
            return Err(TensaError::InvalidParameter(format!(
                "{name} needs {expected} indices, got {}",
                indices.len()
            )));
        }

        points.check_indices(indices)?;

        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(TensaError::InvalidParameter(format!(
                "{name} indices must be distinct, got {indices:?}"
            )));
        }

        check_weight(weight)?;

        Ok(Self {
            indices: indices.to_vec(),
            weight,
        })
    }

    pub fn set_weight(&mut self, weight: f64) -> TensaResult<()> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }
}

fn check_weight(weight: f64) -> TensaResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(TensaError::InvalidParameter(format!(
            "weight must be positive and finite, got {weight}"
        )))
    }
}

/// Validates a relative or absolute `[min, max]` range.
pub(crate) fn check_range(min: f64, max: f64) -> TensaResult<()> {
    if min.is_finite() && max.is_finite() && 0.0 <= min && min <= max {
        Ok(())
    } else {
        Err(TensaError::InvalidParameter(format!(
            "range must satisfy 0 <= min <= max, got [{min}, {max}]"
        )))
    }
}
