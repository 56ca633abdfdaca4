//! Edge length constraint.

use std::any::Any;

use tensa_math::{DVec3, PointSet};
use tensa_types::constants::DEGENERATE_LENGTH_THRESHOLD;
use tensa_types::{Degeneracy, TensaError, TensaResult};

use super::{check_range, Arity, Constraint, ConstraintCore, Stencil};

/// Keeps the distance between two points within `[min, max] × rest length`.
///
/// The rest length is the distance at construction time. The projection
/// moves both endpoints symmetrically about their midpoint along the
/// current edge direction.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStrainConstraint {
    core: ConstraintCore,
    rest_length: f64,
    range_min: f64,
    range_max: f64,
}

impl EdgeStrainConstraint {
    /// Creates a constraint over `indices = [a, b]` with range `[1, 1]`.
    pub fn new(indices: &[usize], weight: f64, points: &PointSet) -> TensaResult<Self> {
        let core = ConstraintCore::new("EdgeStrain", indices, Arity::Exactly(2), weight, points)?;
        let rest_length = (points.point(indices[1]) - points.point(indices[0])).length();
        Ok(Self {
            core,
            rest_length,
            range_min: 1.0,
            range_max: 1.0,
        })
    }

    /// Builder form of [`Self::set_range`].
    pub fn with_range(mut self, min: f64, max: f64) -> TensaResult<Self> {
        self.set_range(min, max)?;
        Ok(self)
    }

    /// Sets the allowed length band as multiples of the rest length.
    pub fn set_range(&mut self, min: f64, max: f64) -> TensaResult<()> {
        check_range(min, max)?;
        self.range_min = min;
        self.range_max = max;
        Ok(())
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    /// Overrides the length captured at construction.
    pub fn set_rest_length(&mut self, length: f64) -> TensaResult<()> {
        if !(length.is_finite() && length >= 0.0) {
            return Err(TensaError::InvalidParameter(format!(
                "rest length must be non-negative, got {length}"
            )));
        }
        self.rest_length = length;
        Ok(())
    }
}

impl Constraint for EdgeStrainConstraint {
    fn name(&self) -> &'static str {
        "EdgeStrain"
    }

    fn indices(&self) -> &[usize] {
        &self.core.indices
    }

    fn weight(&self) -> f64 {
        self.core.weight
    }

    fn set_weight(&mut self, weight: f64) -> TensaResult<()> {
        self.core.set_weight(weight)
    }

    fn stencil(&self) -> Stencil {
        Stencil::Difference
    }

    fn project(&self, points: &PointSet, target: &mut [DVec3]) -> Result<(), Degeneracy> {
        let p0 = points.point(self.core.indices[0]);
        let p1 = points.point(self.core.indices[1]);
        let d = p1 - p0;
        let length = d.length();
        if length < DEGENERATE_LENGTH_THRESHOLD {
            return Err(Degeneracy::ZeroLengthEdge);
        }

        let goal = length.clamp(
            self.range_min * self.rest_length,
            self.range_max * self.rest_length,
        );
        if goal == length {
            target[0] = p0;
            target[1] = p1;
            return Ok(());
        }

        let mid = (p0 + p1) * 0.5;
        let half = d * (0.5 * goal / length);
        target[0] = mid - half;
        target[1] = mid + half;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
