//! Least-squares plane and circle fits for small point groups.
//!
//! The plane is the total-least-squares fit: it passes through the
//! centroid and its normal is the eigenvector of the smallest eigenvalue
//! of the 3×3 covariance matrix (faer's dense self-adjoint
//! eigendecomposition).
//!
//! The circle is the algebraic (Kåsa) fit in the plane's 2D frame:
//! minimize Σ (a² + b² + D·a + E·b + F)², a 3×3 linear system.

use faer::{Mat, Side};
use glam::{DMat3, DVec3};
use tensa_types::constants::RELATIVE_RANK_THRESHOLD;

/// A plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: DVec3,
    pub normal: DVec3,
}

/// A circle embedded in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec3,
    /// Unit normal of the supporting plane.
    pub normal: DVec3,
    pub radius: f64,
    /// In-plane unit axis used when a point sits exactly on the axis line.
    pub reference: DVec3,
}

/// Mean of a non-empty point group.
pub fn centroid(points: &[DVec3]) -> DVec3 {
    let sum = points.iter().fold(DVec3::ZERO, |acc, &p| acc + p);
    sum / points.len().max(1) as f64
}

/// Fits a plane through at least three points.
///
/// Returns `None` when the points are coincident or collinear.
pub fn fit_plane(points: &[DVec3]) -> Option<Plane> {
    if points.len() < 3 {
        return None;
    }
    let origin = centroid(points);

    let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for &p in points {
        let r = p - origin;
        xx += r.x * r.x;
        xy += r.x * r.y;
        xz += r.x * r.z;
        yy += r.y * r.y;
        yz += r.y * r.z;
        zz += r.z * r.z;
    }

    let trace = xx + yy + zz;
    if trace <= 0.0 {
        return None;
    }

    let det_x = yy * zz - yz * yz;
    let det_y = xx * zz - xz * xz;
    let det_z = xx * yy - xy * xy;

    // Rank ≤ 1 covariance: every 2×2 principal minor vanishes.
    if det_x.max(det_y).max(det_z) <= RELATIVE_RANK_THRESHOLD * trace * trace {
        return None;
    }

    let cov = [[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]];
    let eigen = Mat::from_fn(3, 3, |i, j| cov[i][j])
        .self_adjoint_eigen(Side::Lower)
        .ok()?;
    let vectors = eigen.U();

    // Pick the column with the smallest Rayleigh quotient vᵀ·C·v.
    let rayleigh = |v: DVec3| {
        let cv = DVec3::new(
            xx * v.x + xy * v.y + xz * v.z,
            xy * v.x + yy * v.y + yz * v.z,
            xz * v.x + yz * v.y + zz * v.z,
        );
        v.dot(cv)
    };
    let dir = (0..3)
        .map(|k| DVec3::new(vectors[(0, k)], vectors[(1, k)], vectors[(2, k)]))
        .min_by(|a, b| rayleigh(*a).total_cmp(&rayleigh(*b)))?;

    let normal = dir.try_normalize()?;
    Some(Plane { origin, normal })
}

/// Fits a circle through at least three points.
///
/// Returns `None` when the points are collinear or the algebraic fit has
/// no real radius.
pub fn fit_circle(points: &[DVec3]) -> Option<Circle> {
    let plane = fit_plane(points)?;
    let (u, v) = plane.normal.any_orthonormal_pair();

    // In-plane coordinates, scaled to unit RMS radius for conditioning.
    let coords: Vec<(f64, f64)> = points
        .iter()
        .map(|&p| {
            let r = p - plane.origin;
            (r.dot(u), r.dot(v))
        })
        .collect();
    let mean_sq = coords.iter().map(|&(a, b)| a * a + b * b).sum::<f64>() / coords.len() as f64;
    let scale = mean_sq.sqrt();
    if scale <= 0.0 {
        return None;
    }

    let mut m = [[0.0_f64; 3]; 3];
    let mut rhs = DVec3::ZERO;
    for &(a, b) in &coords {
        let row = [a / scale, b / scale, 1.0];
        let q = row[0] * row[0] + row[1] * row[1];
        for i in 0..3 {
            for j in 0..3 {
                m[i][j] += row[i] * row[j];
            }
        }
        rhs -= DVec3::new(row[0], row[1], row[2]) * q;
    }

    let normal_matrix = DMat3::from_cols(
        DVec3::new(m[0][0], m[1][0], m[2][0]),
        DVec3::new(m[0][1], m[1][1], m[2][1]),
        DVec3::new(m[0][2], m[1][2], m[2][2]),
    );
    let n = coords.len() as f64;
    if normal_matrix.determinant().abs() <= RELATIVE_RANK_THRESHOLD * n * n * n {
        return None;
    }

    let sol = normal_matrix.inverse() * rhs;
    let (cx, cy) = (-0.5 * sol.x, -0.5 * sol.y);
    let radius_sq = cx * cx + cy * cy - sol.z;
    if !radius_sq.is_finite() || radius_sq <= 0.0 {
        return None;
    }

    Some(Circle {
        center: plane.origin + (u * cx + v * cy) * scale,
        normal: plane.normal,
        radius: radius_sq.sqrt() * scale,
        reference: u,
    })
}

impl Circle {
    /// Closest point on the circle to `p`.
    pub fn project(&self, p: DVec3) -> DVec3 {
        let d = p - self.center;
        let in_plane = d - self.normal * d.dot(self.normal);
        let dir = in_plane.try_normalize().unwrap_or(self.reference);
        self.center + dir * self.radius
    }
}
