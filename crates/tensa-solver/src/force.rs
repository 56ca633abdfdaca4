//! External forces.
//!
//! Forces add to a per-point accumulator that the solver clears at the
//! start of every `solve` call. They enter the right-hand side of the
//! global step only, so adding or changing a force never touches the
//! factorized system matrix.

use std::any::Any;
use std::fmt::Debug;

use tensa_math::{DVec3, PointSet};
use tensa_types::{TensaError, TensaResult};

/// An external force acting on the point set.
pub trait Force: Debug + Send {
    /// Short variant name, used in logs.
    fn name(&self) -> &'static str;

    /// Adds this force's contribution to `forces` (one slot per point).
    fn add_force(&self, points: &PointSet, forces: &mut [DVec3]);

    /// Checks that every referenced vertex exists.
    fn validate(&self, _vertex_count: usize) -> TensaResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

fn check_vector(force: DVec3) -> TensaResult<()> {
    if force.is_finite() {
        Ok(())
    } else {
        Err(TensaError::InvalidParameter(format!(
            "force must be finite, got {force}"
        )))
    }
}

fn check_vertices<'a>(
    indices: impl IntoIterator<Item = &'a usize>,
    vertex_count: usize,
) -> TensaResult<()> {
    match indices.into_iter().find(|&&i| i >= vertex_count) {
        Some(&index) => Err(TensaError::InvalidIndex {
            index,
            count: vertex_count,
        }),
        None => Ok(()),
    }
}

// ─── Gravity ──────────────────────────────────────────────────

/// The same force vector on every point.
#[derive(Debug, Clone, PartialEq)]
pub struct GravityForce {
    force: DVec3,
}

impl GravityForce {
    pub fn new(force: DVec3) -> TensaResult<Self> {
        check_vector(force)?;
        Ok(Self { force })
    }

    pub fn force(&self) -> DVec3 {
        self.force
    }

    pub fn set_force(&mut self, force: DVec3) -> TensaResult<()> {
        check_vector(force)?;
        self.force = force;
        Ok(())
    }
}

impl Force for GravityForce {
    fn name(&self) -> &'static str {
        "Gravity"
    }

    fn add_force(&self, _points: &PointSet, forces: &mut [DVec3]) {
        for f in forces.iter_mut() {
            *f += self.force;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ─── Vertex ───────────────────────────────────────────────────

/// The same force vector on a subset of points.
///
/// An empty subset applies the force to every point.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexForce {
    force: DVec3,
    indices: Vec<usize>,
}

impl VertexForce {
    pub fn new(force: DVec3, indices: &[usize]) -> TensaResult<Self> {
        check_vector(force)?;
        Ok(Self {
            force,
            indices: indices.to_vec(),
        })
    }

    pub fn force(&self) -> DVec3 {
        self.force
    }

    pub fn set_force(&mut self, force: DVec3) -> TensaResult<()> {
        check_vector(force)?;
        self.force = force;
        Ok(())
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl Force for VertexForce {
    fn name(&self) -> &'static str {
        "Vertex"
    }

    fn add_force(&self, _points: &PointSet, forces: &mut [DVec3]) {
        if self.indices.is_empty() {
            for f in forces.iter_mut() {
                *f += self.force;
            }
        } else {
            for &i in &self.indices {
                forces[i] += self.force;
            }
        }
    }

    fn validate(&self, vertex_count: usize) -> TensaResult<()> {
        check_vertices(&self.indices, vertex_count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ─── Normal ───────────────────────────────────────────────────

/// Pressure-like force along each face's normal.
///
/// Every face spreads `magnitude · n̂` evenly over its vertices, where n̂
/// is the unit normal of the face's leading triangle `(v0, v1, v2)`.
/// Faces whose leading triangle has no area contribute nothing. A face may
/// not list the same vertex twice.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalForce {
    faces: Vec<Vec<usize>>,
    magnitude: f64,
}

impl NormalForce {
    pub fn new(faces: Vec<Vec<usize>>, magnitude: f64) -> TensaResult<Self> {
        if let Some(face) = faces.iter().find(|f| f.len() < 3) {
            return Err(TensaError::InvalidParameter(format!(
                "normal force faces need at least 3 vertices, got {face:?}"
            )));
        }
        if let Some(face) = faces
            .iter()
            .find(|f| f.iter().enumerate().any(|(i, v)| f[..i].contains(v)))
        {
            return Err(TensaError::InvalidParameter(format!(
                "normal force face lists a vertex twice: {face:?}"
            )));
        }
        check_magnitude(magnitude)?;
        Ok(Self { faces, magnitude })
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn set_magnitude(&mut self, magnitude: f64) -> TensaResult<()> {
        check_magnitude(magnitude)?;
        self.magnitude = magnitude;
        Ok(())
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }
}

fn check_magnitude(magnitude: f64) -> TensaResult<()> {
    if magnitude.is_finite() {
        Ok(())
    } else {
        Err(TensaError::InvalidParameter(format!(
            "normal force magnitude must be finite, got {magnitude}"
        )))
    }
}

impl Force for NormalForce {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn add_force(&self, points: &PointSet, forces: &mut [DVec3]) {
        for face in &self.faces {
            let p0 = points.point(face[0]);
            let n = (points.point(face[1]) - p0).cross(points.point(face[2]) - p0);
            let Some(normal) = n.try_normalize() else {
                continue;
            };
            let share = normal * (self.magnitude / face.len() as f64);
            for &v in face {
                forces[v] += share;
            }
        }
    }

    fn validate(&self, vertex_count: usize) -> TensaResult<()> {
        check_vertices(self.faces.iter().flatten(), vertex_count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
