//! The 3×N point matrix optimized by the solver.
//!
//! Stored as three contiguous coordinate channels:
//! - `x: [x0, x1, x2, ...]`
//! - `y: [y0, y1, y2, ...]`
//! - `z: [z0, z1, z2, ...]`
//!
//! The global step solves one linear system per channel, so this
//! layout lets each back-substitution read and write a single slice.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tensa_types::{TensaError, TensaResult};

/// A set of 3D points, column index = vertex id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    /// X coordinates of all points.
    pub x: Vec<f64>,
    /// Y coordinates of all points.
    pub y: Vec<f64>,
    /// Z coordinates of all points.
    pub z: Vec<f64>,
}

impl PointSet {
    /// Creates `n` points at the origin.
    pub fn zeros(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            y: vec![0.0; n],
            z: vec![0.0; n],
        }
    }

    /// Creates an empty set with pre-allocated capacity.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    /// Builds a point set from a slice of vectors.
    pub fn from_points(points: &[DVec3]) -> Self {
        let mut set = Self::with_capacity(points.len());
        for &p in points {
            set.push(p);
        }
        set
    }

    /// Builds a point set from three coordinate channels.
    pub fn from_channels(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> TensaResult<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(TensaError::InvalidParameter(format!(
                "Coordinate channels have inconsistent lengths ({}, {}, {})",
                x.len(),
                y.len(),
                z.len()
            )));
        }
        Ok(Self { x, y, z })
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the set holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Appends a point.
    pub fn push(&mut self, p: DVec3) {
        self.x.push(p.x);
        self.y.push(p.y);
        self.z.push(p.z);
    }

    /// Returns point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> DVec3 {
        DVec3::new(self.x[i], self.y[i], self.z[i])
    }

    /// Overwrites point `i`.
    #[inline]
    pub fn set_point(&mut self, i: usize, p: DVec3) {
        self.x[i] = p.x;
        self.y[i] = p.y;
        self.z[i] = p.z;
    }

    /// Coordinate channel `axis` (0 = X, 1 = Y, 2 = Z).
    pub fn channel(&self, axis: usize) -> &[f64] {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// Mutable coordinate channel `axis` (0 = X, 1 = Y, 2 = Z).
    pub fn channel_mut(&mut self, axis: usize) -> &mut [f64] {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Iterates over all points in id order.
    pub fn iter(&self) -> impl Iterator<Item = DVec3> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    /// Copies all points out as vectors.
    pub fn to_vec(&self) -> Vec<DVec3> {
        self.iter().collect()
    }

    /// Gathers the points at `indices` into `out`.
    pub fn gather(&self, indices: &[usize], out: &mut [DVec3]) {
        for (slot, &i) in out.iter_mut().zip(indices) {
            *slot = self.point(i);
        }
    }

    /// Fails with [`TensaError::InvalidIndex`] unless every index is a valid column.
    pub fn check_indices(&self, indices: &[usize]) -> TensaResult<()> {
        let count = self.len();
        match indices.iter().find(|&&i| i >= count) {
            Some(&index) => Err(TensaError::InvalidIndex { index, count }),
            None => Ok(()),
        }
    }

    /// Returns true if no coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x
            .iter()
            .chain(&self.y)
            .chain(&self.z)
            .all(|v| v.is_finite())
    }
}

impl From<&[DVec3]> for PointSet {
    fn from(points: &[DVec3]) -> Self {
        Self::from_points(points)
    }
}

impl FromIterator<DVec3> for PointSet {
    fn from_iter<T: IntoIterator<Item = DVec3>>(iter: T) -> Self {
        let mut set = Self::default();
        for p in iter {
            set.push(p);
        }
        set
    }
}
