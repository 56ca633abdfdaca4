//! Property-based tests for constraint projections.
//!
//! Random point groups, including coincident and collinear ones, must
//! never produce NaN: a projection either succeeds with finite targets
//! or reports a degeneracy.

use proptest::prelude::*;
use tensa_math::{DVec3, PointSet};
use tensa_solver::{
    AreaConstraint, BendingConstraint, CircleConstraint, Constraint, EdgeStrainConstraint,
};

// =============================================================================
// Strategies
// =============================================================================

/// A coordinate on a coarse lattice so coincident and collinear points are common.
fn arb_coord() -> impl Strategy<Value = f64> {
    prop_oneof![(-3i32..=3).prop_map(f64::from), -10.0..10.0f64]
}

fn arb_point() -> impl Strategy<Value = DVec3> {
    (arb_coord(), arb_coord(), arb_coord()).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

fn arb_points(n: usize) -> impl Strategy<Value = PointSet> {
    prop::collection::vec(arb_point(), n).prop_map(|v| PointSet::from_points(&v))
}

fn check_projection(c: &dyn Constraint, ps: &PointSet) -> Result<(), TestCaseError> {
    let mut target = vec![DVec3::ZERO; c.indices().len()];
    if c.project(ps, &mut target).is_ok() {
        prop_assert!(target.iter().all(|p| p.is_finite()), "non-finite target {target:?}");
    }
    Ok(())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn edge_projection_is_finite(rest in arb_points(2), current in arb_points(2), lo in 0.0..1.0f64, span in 0.0..1.0f64) {
        let c = EdgeStrainConstraint::new(&[0, 1], 1.0, &rest).unwrap().with_range(lo, lo + span).unwrap();
        check_projection(&c, &current)?;
    }

    #[test]
    fn area_projection_is_finite(rest in arb_points(3), current in arb_points(3)) {
        let c = AreaConstraint::new(&[0, 1, 2], 1.0, &rest).unwrap().with_range(0.5, 1.5).unwrap();
        check_projection(&c, &current)?;
    }

    #[test]
    fn bending_projection_is_finite(current in arb_points(4), lo in 0.0..1.5f64) {
        let c = BendingConstraint::new(&[0, 1, 2, 3], 1.0, &current).unwrap().with_range(lo, lo + 1.5).unwrap();
        check_projection(&c, &current)?;
    }

    #[test]
    fn circle_projection_is_finite(current in arb_points(5)) {
        let c = CircleConstraint::new(&[0, 1, 2, 3, 4], 1.0, &current).unwrap();
        check_projection(&c, &current)?;
    }

    /// A successful edge projection lands inside the allowed band.
    #[test]
    fn edge_projection_respects_range(rest in arb_points(2), current in arb_points(2)) {
        let c = EdgeStrainConstraint::new(&[0, 1], 1.0, &rest).unwrap().with_range(0.8, 1.2).unwrap();
        let mut target = [DVec3::ZERO; 2];
        if c.project(&current, &mut target).is_ok() {
            let len = (target[1] - target[0]).length();
            let tol = 1e-9 * (1.0 + c.rest_length());
            prop_assert!(len >= 0.8 * c.rest_length() - tol);
            prop_assert!(len <= 1.2 * c.rest_length() + tol);
        }
    }
}
