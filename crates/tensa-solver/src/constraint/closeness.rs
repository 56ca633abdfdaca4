//! Positional anchor.

use std::any::Any;

use tensa_math::{DVec3, PointSet};
use tensa_types::{Degeneracy, TensaError, TensaResult};

use super::{Arity, Constraint, ConstraintCore, Stencil};

/// Pulls one point toward a goal position.
///
/// The only variant with an identity stencil, so the only one that fixes
/// absolute position. With a large weight it acts as a soft pin.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosenessConstraint {
    core: ConstraintCore,
    goal: DVec3,
}

impl ClosenessConstraint {
    /// Creates an anchor at the point's current position.
    pub fn new(indices: &[usize], weight: f64, points: &PointSet) -> TensaResult<Self> {
        let core = ConstraintCore::new("Closeness", indices, Arity::Exactly(1), weight, points)?;
        let goal = points.point(indices[0]);
        Ok(Self { core, goal })
    }

    /// Rebinds the goal. Takes effect on the next sweep, no re-initialize needed.
    pub fn set_position(&mut self, goal: DVec3) -> TensaResult<()> {
        if !goal.is_finite() {
            return Err(TensaError::InvalidParameter(format!(
                "closeness goal must be finite, got {goal}"
            )));
        }
        self.goal = goal;
        Ok(())
    }

    pub fn goal(&self) -> DVec3 {
        self.goal
    }
}

impl Constraint for ClosenessConstraint {
    fn name(&self) -> &'static str {
        "Closeness"
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
        Stencil::Identity
    }

    fn project(&self, _points: &PointSet, target: &mut [DVec3]) -> Result<(), Degeneracy> {
        target[0] = self.goal;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
