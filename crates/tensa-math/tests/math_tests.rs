//! Integration tests for tensa-math.

use tensa_math::fit::{centroid, fit_circle, fit_plane};
use tensa_math::sparse::CsrMatrix;
use tensa_math::{DVec3, PointSet};
use tensa_types::TensaError;

// ─── PointSet Tests ───────────────────────────────────────────

#[test]
fn point_set_from_points() {
    let pts = PointSet::from_points(&[DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 5.0, 6.0)]);
    assert_eq!(pts.len(), 2);
    assert_eq!(pts.point(1), DVec3::new(4.0, 5.0, 6.0));
    assert_eq!(pts.channel(1), &[2.0, 5.0]);
}

#[test]
fn point_set_set_point_and_gather() {
    let mut pts = PointSet::zeros(3);
    pts.set_point(2, DVec3::new(7.0, 8.0, 9.0));
    let mut out = [DVec3::ZERO; 2];
    pts.gather(&[2, 0], &mut out);
    assert_eq!(out[0], DVec3::new(7.0, 8.0, 9.0));
    assert_eq!(out[1], DVec3::ZERO);
}

#[test]
fn point_set_inconsistent_channels_rejected() {
    let result = PointSet::from_channels(vec![0.0; 3], vec![0.0; 2], vec![0.0; 3]);
    assert!(matches!(result, Err(TensaError::InvalidParameter(_))));
}

#[test]
fn point_set_check_indices() {
    let pts = PointSet::zeros(4);
    assert!(pts.check_indices(&[0, 3]).is_ok());
    match pts.check_indices(&[1, 4]) {
        Err(TensaError::InvalidIndex { index, count }) => {
            assert_eq!(index, 4);
            assert_eq!(count, 4);
        }
        other => panic!("expected InvalidIndex, got {other:?}"),
    }
}

#[test]
fn point_set_finite_check() {
    let mut pts = PointSet::zeros(2);
    assert!(pts.is_finite());
    pts.y[1] = f64::NAN;
    assert!(!pts.is_finite());
}

#[test]
fn point_set_serialization() {
    let pts = PointSet::from_points(&[DVec3::X, DVec3::Y]);
    let json = serde_json::to_string(&pts).unwrap();
    let recovered: PointSet = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, pts);
}

// ─── Sparse Matrix Tests ─────────────────────────────────────

#[test]
fn csr_new_has_no_entries() {
    let m = CsrMatrix::new(2, 4);
    assert_eq!((m.rows, m.cols, m.nnz()), (2, 4, 0));
    assert_eq!(m.row_ptr, vec![0, 0, 0]);
}

#[test]
fn csr_rows_sorted_by_column() {
    let m = CsrMatrix::from_triplets(2, 3, &[(1, 2, 6.0), (0, 1, 2.0), (1, 0, 4.0)]);
    assert_eq!(m.row_ptr, vec![0, 1, 3]);
    assert_eq!(m.col_idx, vec![1, 0, 2]);
    assert_eq!(m.values, vec![2.0, 4.0, 6.0]);
    assert_eq!(m.get(0, 0), 0.0);
}

#[test]
fn csr_from_triplets_sums_duplicates() {
    let triplets = vec![(0, 1, 2.0), (0, 1, 3.0), (1, 0, -1.0), (1, 0, 1.0)];
    let m = CsrMatrix::from_triplets(2, 2, &triplets);
    assert_eq!(m.nnz(), 2);
    assert_eq!(m.get(0, 1), 5.0);
    // Cancelled entries stay in the pattern.
    assert_eq!(m.get(1, 0), 0.0);
    assert_eq!(m.col_idx, vec![1, 0]);
}

#[test]
fn csr_transpose_mul() {
    // A = [[1, -1, 0], [0, 2, 1]]
    let a = CsrMatrix::from_triplets(2, 3, &[(0, 0, 1.0), (0, 1, -1.0), (1, 1, 2.0), (1, 2, 1.0)]);
    let mut out = [0.0; 3];
    a.transpose_mul(&[3.0, 5.0], &mut out);
    assert_eq!(out, [3.0, 7.0, 5.0]);
}

#[test]
fn csr_gram_of_difference_row() {
    // A = [-2, 2] → AᵀA = [[4, -4], [-4, 4]]
    let a = CsrMatrix::from_triplets(1, 2, &[(0, 0, -2.0), (0, 1, 2.0)]);
    let l = a.gram();
    assert_eq!(l.get(0, 0), 4.0);
    assert_eq!(l.get(0, 1), -4.0);
    assert_eq!(l.get(1, 0), -4.0);
    assert_eq!(l.get(1, 1), 4.0);
}

#[test]
fn csr_added_diagonal_inserts_missing_entries() {
    let a = CsrMatrix::from_triplets(2, 2, &[(0, 1, 1.0), (1, 0, 1.0)]);
    let b = a.with_added_diagonal(&[2.0, 3.0]);
    assert_eq!(b.get(0, 0), 2.0);
    assert_eq!(b.get(1, 1), 3.0);
    assert_eq!(b.get(0, 1), 1.0);
    assert!(!a.same_pattern(&b));
}

#[test]
fn csr_same_pattern_ignores_values() {
    let a = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, 1.0)]);
    let b = CsrMatrix::from_triplets(2, 2, &[(0, 0, 9.0), (1, 1, 4.0)]);
    assert!(a.same_pattern(&b));
}

// ─── FaerSolver Tests ────────────────────────────────────────

use tensa_math::faer_solver::FaerSolver;
use tensa_math::sparse::SparseSolver;

/// Normal matrix of a chain of `n` points: unit difference rows between
/// neighbors plus an anchor row of weight `anchor` on point 0.
fn anchored_chain(n: usize, anchor: f64) -> CsrMatrix {
    let mut rows = vec![(0, 0, anchor.sqrt())];
    for i in 0..n - 1 {
        rows.push((i + 1, i, -1.0));
        rows.push((i + 1, i + 1, 1.0));
    }
    CsrMatrix::from_triplets(n, n, &rows).gram()
}

fn max_residual(matrix: &CsrMatrix, x: &[f64], b: &[f64]) -> f64 {
    (0..matrix.rows)
        .map(|r| {
            let ax: f64 = (matrix.row_ptr[r]..matrix.row_ptr[r + 1])
                .map(|k| matrix.values[k] * x[matrix.col_idx[k]])
                .sum();
            (ax - b[r]).abs()
        })
        .fold(0.0, f64::max)
}

#[test]
fn faer_solves_anchored_chain() {
    let matrix = anchored_chain(5, 4.0);
    let mut solver = FaerSolver::new();
    assert!(!solver.is_factorized());
    solver.factorize(&matrix).unwrap();
    assert!(solver.is_factorized());

    // Anchor pulls point 0 toward 2 (rhs = w·2); the chain follows rigidly.
    let mut rhs = vec![0.0; 5];
    rhs[0] = 8.0;
    let mut sol = vec![0.0; 5];
    solver.solve(&rhs, &mut sol).unwrap();
    for (i, &x) in sol.iter().enumerate() {
        assert!((x - 2.0).abs() < 1e-10, "sol[{i}] = {x}");
    }
}

#[test]
fn faer_one_factor_many_right_hand_sides() {
    let matrix = anchored_chain(40, 1.0e5).with_added_diagonal(&[0.5; 40]);
    let mut solver = FaerSolver::new();
    solver.factorize(&matrix).unwrap();

    // One solve per coordinate axis, as the global step does.
    for axis in 0..3 {
        let rhs: Vec<f64> = (0..40).map(|i| (i * (axis + 1)) as f64 * 0.1 - 1.0).collect();
        let mut sol = vec![0.0; 40];
        solver.solve(&rhs, &mut sol).unwrap();
        let r = max_residual(&matrix, &sol, &rhs);
        assert!(r < 1e-7, "axis {axis}: residual {r}");
    }
}

#[test]
fn faer_refactor_same_pattern_reuses_symbolic() {
    let mut solver = FaerSolver::new();
    solver.factorize(&anchored_chain(3, 1.0)).unwrap();
    assert!(!solver.reused_symbolic());

    // New weight, same pattern: only the numeric factor is recomputed.
    let heavier = anchored_chain(3, 9.0);
    solver.factorize(&heavier).unwrap();
    assert!(solver.reused_symbolic());

    let rhs = [9.0, 0.0, 0.0];
    let mut sol = [0.0; 3];
    solver.solve(&rhs, &mut sol).unwrap();
    assert!(sol.iter().all(|&x| (x - 1.0).abs() < 1e-12));

    // A longer chain needs a fresh analysis.
    solver.factorize(&anchored_chain(4, 1.0)).unwrap();
    assert!(!solver.reused_symbolic());
}

#[test]
fn faer_unanchored_chain_fails() {
    // Pure difference rows: singular Laplacian
    let matrix = anchored_chain(3, 0.0);
    let mut solver = FaerSolver::new();
    assert!(solver.factorize(&matrix).is_err());
    assert!(!solver.is_factorized());
}

#[test]
fn faer_failed_refactor_drops_previous_factor() {
    let mut solver = FaerSolver::new();
    solver.factorize(&anchored_chain(2, 1.0)).unwrap();
    let indefinite = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, -1.0)]);
    assert!(solver.factorize(&indefinite).is_err());
    assert!(!solver.is_factorized());
}

#[test]
fn faer_rejects_bad_shapes() {
    let mut solver = FaerSolver::new();
    let mut sol = [0.0; 2];
    assert!(solver.solve(&[1.0, 1.0], &mut sol).is_err());

    assert!(solver.factorize(&CsrMatrix::new(0, 0)).is_err());
    assert!(solver.factorize(&CsrMatrix::from_triplets(2, 3, &[(0, 0, 1.0)])).is_err());

    solver.factorize(&anchored_chain(2, 1.0)).unwrap();
    assert!(solver.solve(&[1.0; 3], &mut [0.0; 3]).is_err());
    assert!(solver.solve(&[1.0; 2], &mut [0.0; 1]).is_err());

    solver.invalidate();
    assert!(!solver.is_factorized());
}

// ─── Fit Tests ────────────────────────────────────────────────

fn circle_points(center: DVec3, radius: f64, n: usize) -> Vec<DVec3> {
    (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64 + 0.3;
            // Circle in a tilted plane spanned by (1,0,1)/√2 and (0,1,0)
            let u = DVec3::new(1.0, 0.0, 1.0).normalize();
            center + (u * t.cos() + DVec3::Y * t.sin()) * radius
        })
        .collect()
}

#[test]
fn centroid_of_square() {
    let pts = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y];
    assert!((centroid(&pts) - DVec3::new(0.5, 0.5, 0.0)).length() < 1e-15);
}

#[test]
fn plane_fit_recovers_normal() {
    let pts = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)];
    let plane = fit_plane(&pts).unwrap();
    assert!((plane.normal.dot(DVec3::Z).abs() - 1.0).abs() < 1e-12);
}

#[test]
fn plane_fit_rejects_collinear() {
    let pts = [DVec3::ZERO, DVec3::X, DVec3::X * 2.0, DVec3::X * 3.0];
    assert!(fit_plane(&pts).is_none());
}

#[test]
fn plane_fit_minimizes_residual_on_scattered_points() {
    let pts = [
        DVec3::new(0.0, 0.0, 0.3),
        DVec3::new(2.0, 0.1, -0.2),
        DVec3::new(0.2, 1.5, 0.4),
        DVec3::new(1.8, 1.7, -0.1),
        DVec3::new(1.0, 0.8, 0.9),
        DVec3::new(0.5, 2.2, -0.6),
    ];
    let plane = fit_plane(&pts).unwrap();
    let residual = |n: DVec3| -> f64 {
        pts.iter()
            .map(|p| (*p - plane.origin).dot(n).powi(2))
            .sum()
    };
    let fitted = residual(plane.normal);
    // Sweep the unit sphere; no direction may beat the fitted normal.
    let steps = 90;
    for i in 0..=steps {
        let theta = std::f64::consts::PI * i as f64 / steps as f64;
        for j in 0..(2 * steps) {
            let phi = std::f64::consts::PI * j as f64 / steps as f64;
            let n = DVec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            assert!(fitted <= residual(n) + 1e-12, "direction {n} beats fit");
        }
    }
    // The sweep contains the coordinate axes; the fit must beat the z axis outright.
    assert!(fitted < residual(DVec3::Z) - 1e-6);
}

#[test]
fn plane_fit_tilted_plane_exact() {
    let normal = DVec3::new(1.0, -2.0, 2.0).normalize();
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);
    let origin = DVec3::new(0.5, 0.5, -1.0);
    let pts: Vec<DVec3> = [(0.0, 0.0), (1.0, 0.2), (-0.4, 1.1), (0.7, -0.9), (2.0, 1.5)]
        .iter()
        .map(|&(a, b)| origin + u * a + v * b)
        .collect();
    let plane = fit_plane(&pts).unwrap();
    assert!((plane.normal.dot(normal).abs() - 1.0).abs() < 1e-10);
    for p in &pts {
        assert!((*p - plane.origin).dot(plane.normal).abs() < 1e-10);
    }
}

#[test]
fn circle_fit_exact_points() {
    let center = DVec3::new(1.0, -2.0, 0.5);
    let pts = circle_points(center, 2.5, 7);
    let circle = fit_circle(&pts).unwrap();
    assert!((circle.center - center).length() < 1e-9);
    assert!((circle.radius - 2.5).abs() < 1e-9);
    for &p in &pts {
        assert!((circle.project(p) - p).length() < 1e-9);
    }
}

#[test]
fn circle_fit_three_points() {
    let pts = [DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)];
    let circle = fit_circle(&pts).unwrap();
    assert!(circle.center.length() < 1e-9);
    assert!((circle.radius - 1.0).abs() < 1e-9);
}

#[test]
fn circle_fit_rejects_collinear() {
    let pts = [DVec3::ZERO, DVec3::Y, DVec3::Y * 5.0];
    assert!(fit_circle(&pts).is_none());
}

#[test]
fn circle_project_center_uses_reference_axis() {
    let pts = [DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)];
    let circle = fit_circle(&pts).unwrap();
    let projected = circle.project(circle.center);
    assert!(projected.is_finite());
    assert!(((projected - circle.center).length() - circle.radius).abs() < 1e-9);
}
