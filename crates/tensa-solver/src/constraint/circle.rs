//! Circularity constraint.

use std::any::Any;

use tensa_math::fit::fit_circle;
use tensa_math::{DVec3, PointSet};
use tensa_types::{Degeneracy, TensaResult};

use super::{Arity, Constraint, ConstraintCore, Stencil};

/// Pulls three or more points onto a common circle.
///
/// The circle is refit every sweep: a least-squares plane through the
/// points, then an algebraic circle fit inside that plane. Each point is
/// projected radially onto the result. Position, radius and orientation
/// are all free.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleConstraint {
    core: ConstraintCore,
}

impl CircleConstraint {
    pub fn new(indices: &[usize], weight: f64, points: &PointSet) -> TensaResult<Self> {
        let core = ConstraintCore::new("Circle", indices, Arity::AtLeast(3), weight, points)?;
        Ok(Self { core })
    }
}

impl Constraint for CircleConstraint {
    fn name(&self) -> &'static str {
        "Circle"
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
        Stencil::MeanCentered
    }

    fn project(&self, points: &PointSet, target: &mut [DVec3]) -> Result<(), Degeneracy> {
        points.gather(&self.core.indices, target);
        let circle = fit_circle(target).ok_or(Degeneracy::CollinearPoints)?;
        for p in target.iter_mut() {
            *p = circle.project(*p);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
