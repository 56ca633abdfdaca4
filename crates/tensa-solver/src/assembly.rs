//! Global system assembly for the local-global solver.
//!
//! Builds the stacked operator `A` whose rows are every constraint's
//! `√wᵢ · Sᵢ`, and from it the constant system matrix
//!
//! ```text
//! L = AᵀA  (+ m/h² · I in dynamic mode)
//! ```
//!
//! The matrix is N×N (one per coordinate axis), solved three times
//! per sweep (for X, Y, Z) using the same cached factorization.
//!
//! Also assembles the per-axis RHS `Aᵀ·P + F (+ m/h² · y)`, where `P`
//! holds the projections mapped through the same weighted stencils.

use tensa_math::sparse::CsrMatrix;
use tensa_math::DVec3;
use tensa_types::{TensaError, TensaResult};

use crate::constraint::Constraint;

/// Operator and system matrix produced by `initialize`.
#[derive(Debug, Clone)]
pub struct AssembledSystem {
    /// Stacked weighted operator `A` (total rows × N).
    pub operator: CsrMatrix,
    /// First operator row of each constraint, plus the total row count.
    pub row_offsets: Vec<usize>,
    /// `AᵀA`, plus the inertia diagonal in dynamic mode.
    pub matrix: CsrMatrix,
    /// `m/h²` in dynamic mode, zero for static solves.
    pub inertia: f64,
    /// Constraint weights the matrix was built with.
    pub weights: Vec<f64>,
}

impl AssembledSystem {
    /// Assembles the operator and system matrix for `n` points.
    pub fn build(constraints: &[Box<dyn Constraint>], n: usize, inertia: f64) -> Self {
        let (operator, row_offsets) = assemble_operator(constraints, n);
        let matrix = assemble_system_matrix(&operator, inertia);
        Self {
            operator,
            row_offsets,
            matrix,
            inertia,
            weights: constraints.iter().map(|c| c.weight()).collect(),
        }
    }

    /// Total number of operator rows.
    pub fn rows(&self) -> usize {
        self.operator.rows
    }

    /// Returns true if the constraint list no longer matches what was assembled.
    pub fn is_stale(&self, constraints: &[Box<dyn Constraint>]) -> bool {
        self.weights.len() != constraints.len()
            || self
                .weights
                .iter()
                .zip(constraints)
                .any(|(&w, c)| w != c.weight())
    }
}

/// Stacks every constraint's weighted stencil into one sparse operator.
///
/// Returns the operator and the row offset of each constraint (with the
/// total row count appended).
pub fn assemble_operator(constraints: &[Box<dyn Constraint>], n: usize) -> (CsrMatrix, Vec<usize>) {
    let capacity: usize = constraints
        .iter()
        .map(|c| c.rows() * c.indices().len())
        .sum();
    let mut triplets = Vec::with_capacity(capacity);
    let mut row_offsets = Vec::with_capacity(constraints.len() + 1);
    let mut row = 0;

    for constraint in constraints {
        row_offsets.push(row);
        constraint.add_to_system(&mut triplets, &mut row);
    }
    row_offsets.push(row);

    (CsrMatrix::from_triplets(row, n, &triplets), row_offsets)
}

/// Assemble the system matrix `L = AᵀA + inertia · I`.
///
/// This matrix is constant as long as:
/// - no constraint is added or removed
/// - no weight changes
/// - the dynamic-mode mass and timestep stay the same
pub fn assemble_system_matrix(operator: &CsrMatrix, inertia: f64) -> CsrMatrix {
    let gram = operator.gram();
    if inertia > 0.0 {
        gram.with_added_diagonal(&vec![inertia; operator.cols])
    } else {
        gram
    }
}

/// Assemble the RHS for one coordinate axis.
///
/// # Arguments
/// * `operator` — Stacked weighted operator `A`
/// * `projections` — `√w · S · p` for every operator row
/// * `forces` — Accumulated external force per point
/// * `inertia` — `m/h²`, zero in static mode
/// * `prediction` — Inertial prediction `y` per point (ignored when `inertia` is zero)
/// * `axis` — 0 = X, 1 = Y, 2 = Z
/// * `scratch` — Reused buffer for the axis slice of `projections`
/// * `rhs` — Output, one entry per point
#[allow(clippy::too_many_arguments)]
pub fn assemble_rhs(
    operator: &CsrMatrix,
    projections: &[DVec3],
    forces: &[DVec3],
    inertia: f64,
    prediction: &[DVec3],
    axis: usize,
    scratch: &mut Vec<f64>,
    rhs: &mut [f64],
) {
    scratch.clear();
    scratch.extend(projections.iter().map(|p| p[axis]));
    operator.transpose_mul(scratch, rhs);

    for (i, out) in rhs.iter_mut().enumerate() {
        *out += forces[i][axis];
    }
    if inertia > 0.0 {
        for (out, y) in rhs.iter_mut().zip(prediction) {
            *out += inertia * y[axis];
        }
    }
}

/// Checks that a static system has a unique minimizer.
///
/// Difference and mean-centered stencils only see relative positions, so
/// every group of points linked through constraints needs at least one
/// identity-stencil (Closeness) constraint to fix where it sits. A point
/// no constraint touches is its own unanchored group.
pub fn check_well_posed(constraints: &[Box<dyn Constraint>], n: usize) -> TensaResult<()> {
    let mut groups = DisjointSet::new(n);
    for constraint in constraints {
        if let Some((&first, rest)) = constraint.indices().split_first() {
            for &other in rest {
                groups.union(first, other);
            }
        }
    }

    let mut anchored = vec![false; n];
    for constraint in constraints.iter().filter(|c| c.stencil().anchors()) {
        for &i in constraint.indices() {
            let root = groups.find(i);
            anchored[root] = true;
        }
    }

    for vertex in 0..n {
        if !anchored[groups.find(vertex)] {
            return Err(TensaError::UnderConstrained { vertex });
        }
    }
    Ok(())
}

/// Union-find over point indices with path halving.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}
