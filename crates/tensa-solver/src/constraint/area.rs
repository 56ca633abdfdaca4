//! Triangle area constraint.

use std::any::Any;

use tensa_math::fit::centroid;
use tensa_math::{DVec3, PointSet};
use tensa_types::constants::DEGENERATE_AREA_THRESHOLD;
use tensa_types::{Degeneracy, TensaResult};

use super::{check_range, Arity, Constraint, ConstraintCore, Stencil};

/// Keeps a triangle's area within `[min, max] × rest area`.
///
/// Projection scales the triangle uniformly about its centroid, so the
/// shape and orientation are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaConstraint {
    core: ConstraintCore,
    rest_area: f64,
    range_min: f64,
    range_max: f64,
}

impl AreaConstraint {
    /// Creates a constraint over three indices with range `[1, 1]`.
    pub fn new(indices: &[usize], weight: f64, points: &PointSet) -> TensaResult<Self> {
        let core = ConstraintCore::new("Area", indices, Arity::Exactly(3), weight, points)?;
        let rest_area = triangle_area(
            points.point(indices[0]),
            points.point(indices[1]),
            points.point(indices[2]),
        );
        Ok(Self {
            core,
            rest_area,
            range_min: 1.0,
            range_max: 1.0,
        })
    }

    pub fn with_range(mut self, min: f64, max: f64) -> TensaResult<Self> {
        self.set_range(min, max)?;
        Ok(self)
    }

    /// Sets the allowed area band as multiples of the rest area.
    pub fn set_range(&mut self, min: f64, max: f64) -> TensaResult<()> {
        check_range(min, max)?;
        self.range_min = min;
        self.range_max = max;
        Ok(())
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    pub fn rest_area(&self) -> f64 {
        self.rest_area
    }
}

fn triangle_area(p0: DVec3, p1: DVec3, p2: DVec3) -> f64 {
    0.5 * (p1 - p0).cross(p2 - p0).length()
}

impl Constraint for AreaConstraint {
    fn name(&self) -> &'static str {
        "Area"
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
        let area = triangle_area(target[0], target[1], target[2]);
        if area < DEGENERATE_AREA_THRESHOLD {
            return Err(Degeneracy::ZeroAreaTriangle);
        }

        let goal = area.clamp(
            self.range_min * self.rest_area,
            self.range_max * self.rest_area,
        );
        if goal == area {
            return Ok(());
        }

        // Area scales with the square of the linear factor.
        let scale = (goal / area).sqrt();
        let center = centroid(target);
        for p in target.iter_mut() {
            *p = center + (*p - center) * scale;
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
