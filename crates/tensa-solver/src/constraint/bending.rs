//! Dihedral angle constraint on a hinge of two triangles.
//!
//! ```text
//!        wa
//!       / \
//!      / A \
//!    e0 ─── e1
//!      \ B /
//!       \ /
//!        wb
//! ```
//!
//! θ is the angle between the two triangle normals: a flat hinge has
//! θ = 0 and a hinge folded shut (wings coinciding) has θ = π. It is
//! measured as π minus the angle between the perpendiculars dropped from
//! the wings onto the shared edge line.

use std::any::Any;
use std::f64::consts::PI;

use tensa_math::{DVec3, PointSet};
use tensa_types::constants::DEGENERATE_LENGTH_THRESHOLD;
use tensa_types::{Degeneracy, TensaError, TensaResult};

use super::{check_range, Arity, Constraint, ConstraintCore, Stencil};

/// Keeps a hinge's dihedral angle within an absolute range (radians).
///
/// Indices are ordered `[edge0, edge1, wing_a, wing_b]`. The projection
/// rotates the wings about the shared edge by equal and opposite amounts;
/// the edge vertices are left in place.
#[derive(Debug, Clone, PartialEq)]
pub struct BendingConstraint {
    core: ConstraintCore,
    rest_angle: f64,
    range_min: f64,
    range_max: f64,
}

impl BendingConstraint {
    /// Creates a constraint with the permissive range `[0, π]`.
    pub fn new(indices: &[usize], weight: f64, points: &PointSet) -> TensaResult<Self> {
        let core = ConstraintCore::new("Bending", indices, Arity::Exactly(4), weight, points)?;
        let mut corners = [DVec3::ZERO; 4];
        points.gather(indices, &mut corners);
        // A degenerate hinge at rest is reported at projection time.
        let rest_angle = hinge_angle(&corners).map_or(0.0, |h| h.angle);
        Ok(Self {
            core,
            rest_angle,
            range_min: 0.0,
            range_max: PI,
        })
    }

    pub fn with_range(mut self, min: f64, max: f64) -> TensaResult<Self> {
        self.set_range(min, max)?;
        Ok(self)
    }

    /// Sets the allowed dihedral angle band, in radians within `[0, π]`.
    pub fn set_range(&mut self, min: f64, max: f64) -> TensaResult<()> {
        check_range(min, max)?;
        if max > PI {
            return Err(TensaError::InvalidParameter(format!(
                "bending range must stay within [0, π], got max {max}"
            )));
        }
        self.range_min = min;
        self.range_max = max;
        Ok(())
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    /// Dihedral angle at construction time.
    pub fn rest_angle(&self) -> f64 {
        self.rest_angle
    }
}

/// Hinge frame at the current positions.
struct HingeAngle {
    /// Unit edge direction, the rotation axis.
    axis: DVec3,
    /// Angle between the triangle normals, in `[0, π]`.
    angle: f64,
    /// Orientation of wing B relative to wing A around `axis`.
    sign: f64,
}

fn hinge_angle(corners: &[DVec3; 4]) -> Result<HingeAngle, Degeneracy> {
    let [e0, e1, wa, wb] = *corners;
    let edge = e1 - e0;
    let length = edge.length();
    if length < DEGENERATE_LENGTH_THRESHOLD {
        return Err(Degeneracy::ZeroLengthHinge);
    }
    let axis = edge / length;

    let perpendicular = |w: DVec3| {
        let r = w - e0;
        r - axis * r.dot(axis)
    };
    let ua = perpendicular(wa);
    let ub = perpendicular(wb);
    if ua.length() < DEGENERATE_LENGTH_THRESHOLD || ub.length() < DEGENERATE_LENGTH_THRESHOLD {
        return Err(Degeneracy::CoincidentWings);
    }

    let signed = axis.dot(ua.cross(ub)).atan2(ua.dot(ub));
    Ok(HingeAngle {
        axis,
        angle: PI - signed.abs(),
        sign: if signed >= 0.0 { 1.0 } else { -1.0 },
    })
}

/// Rotate point `p` around an axis through `center` by `angle` radians.
fn rotate_around_axis(p: DVec3, center: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    let v = p - center;
    let (sin_a, cos_a) = angle.sin_cos();
    let dot = axis.dot(v);

    let rotated = v * cos_a + axis.cross(v) * sin_a + axis * dot * (1.0 - cos_a);
    center + rotated
}

impl Constraint for BendingConstraint {
    fn name(&self) -> &'static str {
        "Bending"
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
        let mut corners = [DVec3::ZERO; 4];
        points.gather(&self.core.indices, &mut corners);
        let hinge = hinge_angle(&corners)?;

        target.copy_from_slice(&corners);
        let goal = hinge.angle.clamp(self.range_min, self.range_max);
        if goal == hinge.angle {
            return Ok(());
        }

        // Rotating the wings apart by δ/2 each opens the wing angle by δ,
        // which lowers the normal angle by δ.
        let half = 0.5 * hinge.sign * (hinge.angle - goal);
        target[2] = rotate_around_axis(corners[2], corners[0], hinge.axis, -half);
        target[3] = rotate_around_axis(corners[3], corners[0], hinge.axis, half);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
