//! Local-global shape solver.
//!
//! Implements the iteration loop:
//! 1. **Forces** — accumulate external forces once per `solve` call
//! 2. **Predict** (dynamic mode) — inertial position `y = x + h·v`
//! 3. **Local step** — project every constraint onto its feasible set
//! 4. **Global step** — solve the constant SPD system `L · x = rhs`
//! 5. **Repeat** steps 3–4 for the requested number of sweeps
//! 6. **Finalize** (dynamic mode) — update velocities from position change

use std::time::Instant;

use tensa_math::faer_solver::FaerSolver;
use tensa_math::sparse::SparseSolver;
use tensa_math::{DVec3, PointSet};
use tensa_types::{ConstraintId, ForceId, TensaError, TensaResult};
use tracing::{debug, info, trace, warn};

use crate::assembly::{assemble_rhs, check_well_posed, AssembledSystem};
use crate::config::SolverConfig;
use crate::constraint::Constraint;
use crate::force::Force;

/// Result of a `solve` call.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Number of sweeps actually performed.
    pub sweeps: u32,
    /// Projections that hit degenerate geometry, summed over all sweeps.
    pub degenerate_projections: usize,
    /// `‖x_new − x_old‖ / ‖x_old‖` of the last sweep.
    pub relative_change: f64,
    /// Whether the last sweep moved less than the configured tolerance.
    pub converged: bool,
    /// Wall-clock time for this call (seconds).
    pub wall_time: f64,
}

/// Constraint-based shape optimizer.
///
/// Owns the point set, the registered constraints and forces, and the
/// factorized system matrix. Typical use:
///
/// ```text
/// solver.set_points(points)?;
/// solver.add_constraint(Box::new(EdgeStrainConstraint::new(&[0, 1], 10.0, &points)?));
/// solver.initialize(false)?;
/// solver.solve(100)?;
/// let result = solver.points();
/// ```
///
/// The system matrix depends only on which constraints exist and their
/// weights. Adding a constraint or changing a weight after `initialize`
/// makes `solve` fail with [`TensaError::StaleSystem`] until `initialize`
/// runs again. Ranges, goals, forces and positions can change freely.
pub struct ShapeSolver {
    points: PointSet,
    constraints: Vec<Box<dyn Constraint>>,
    forces: Vec<Box<dyn Force>>,
    config: SolverConfig,
    /// Assembled operator and matrix, present once initialized.
    system: Option<AssembledSystem>,
    /// Sparse Cholesky solver with cached factorization.
    linear: FaerSolver,
    dynamic: bool,
    /// Per-point velocity, only advanced in dynamic mode.
    velocities: Vec<DVec3>,
}

impl ShapeSolver {
    /// Creates an empty solver with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            points: PointSet::default(),
            constraints: Vec::new(),
            forces: Vec::new(),
            config,
            system: None,
            linear: FaerSolver::new(),
            dynamic: false,
            velocities: Vec::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replaces the configuration. Drops the factorization, since mass
    /// and timestep feed the dynamic-mode diagonal.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
        self.uninitialize();
    }

    /// Replaces the point set and zeroes velocities.
    ///
    /// Keeping the point count leaves the factorization usable. A
    /// different count returns the solver to the uninitialized state.
    pub fn set_points(&mut self, points: PointSet) -> TensaResult<()> {
        if !points.is_finite() {
            return Err(TensaError::InvalidParameter(
                "point coordinates must be finite".into(),
            ));
        }
        if points.len() != self.points.len() {
            self.uninitialize();
        }
        self.velocities = vec![DVec3::ZERO; points.len()];
        self.points = points;
        Ok(())
    }

    /// Current positions.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Consumes the solver, returning the positions.
    pub fn into_points(self) -> PointSet {
        self.points
    }

    /// Current velocities (all zero outside dynamic mode).
    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    /// Registers a constraint. Indices are checked again at `initialize`.
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> ConstraintId {
        let id = ConstraintId(self.constraints.len() as u32);
        self.constraints.push(constraint);
        id
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&dyn Constraint> {
        self.constraints.get(id.index()).map(|c| c.as_ref())
    }

    /// Mutable access through the trait. Changing the weight here makes
    /// the system stale.
    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut (dyn Constraint + 'static)> {
        self.constraints.get_mut(id.index()).map(|c| c.as_mut())
    }

    /// Typed access to a registered constraint, e.g. to read its rest state.
    pub fn constraint_as<T: Constraint + 'static>(&self, id: ConstraintId) -> Option<&T> {
        self.constraints
            .get(id.index())
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Typed mutable access, e.g. to change a range or goal.
    pub fn constraint_as_mut<T: Constraint + 'static>(&mut self, id: ConstraintId) -> Option<&mut T> {
        self.constraints
            .get_mut(id.index())
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Registers a force. Vertex references are checked on every `solve`.
    pub fn add_force(&mut self, force: Box<dyn Force>) -> ForceId {
        let id = ForceId(self.forces.len() as u32);
        self.forces.push(force);
        id
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    pub fn force_as_mut<T: Force + 'static>(&mut self, id: ForceId) -> Option<&mut T> {
        self.forces
            .get_mut(id.index())
            .and_then(|f| f.as_any_mut().downcast_mut::<T>())
    }

    /// Returns true once `initialize` has succeeded for the current point count.
    pub fn is_initialized(&self) -> bool {
        self.system.is_some()
    }

    /// Returns true if the last `initialize` selected dynamic mode.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    fn uninitialize(&mut self) {
        self.system = None;
        self.linear.invalidate();
    }

    /// Assembles and factorizes the global system.
    ///
    /// `dynamic` adds the inertia term `mass / timestep²` to the diagonal,
    /// making each `solve` call one implicit time step. Static systems
    /// must anchor every group of linked points with a Closeness
    /// constraint. If the sparsity pattern matches the previous
    /// factorization, only the numeric factor is recomputed.
    pub fn initialize(&mut self, dynamic: bool) -> TensaResult<()> {
        self.uninitialize();
        self.config.validate()?;

        if self.constraints.is_empty() {
            return Err(TensaError::NoConstraints);
        }
        let n = self.points.len();
        for constraint in &self.constraints {
            self.points.check_indices(constraint.indices())?;
        }
        for force in &self.forces {
            force.validate(n)?;
        }
        if !dynamic {
            check_well_posed(&self.constraints, n)?;
        }

        let inertia = if dynamic { self.config.inertia() } else { 0.0 };
        let system = AssembledSystem::build(&self.constraints, n, inertia);

        if let Err(e) = self.linear.factorize(&system.matrix) {
            warn!(points = n, constraints = self.constraints.len(), "factorization failed: {e}");
            return Err(TensaError::Factorization(e));
        }

        info!(
            points = n,
            constraints = self.constraints.len(),
            rows = system.rows(),
            nnz = system.matrix.nnz(),
            dynamic,
            reused_symbolic = self.linear.reused_symbolic(),
            "system factorized"
        );

        if self.velocities.len() != n {
            self.velocities = vec![DVec3::ZERO; n];
        }
        self.dynamic = dynamic;
        self.system = Some(system);
        Ok(())
    }

    /// Runs up to `iterations` local-global sweeps.
    ///
    /// Forces are evaluated once, at the positions on entry. In dynamic
    /// mode the whole call is one time step of length `timestep`.
    pub fn solve(&mut self, iterations: u32) -> TensaResult<SolveReport> {
        if iterations == 0 {
            return Err(TensaError::InvalidConfig(
                "solve needs at least one iteration".into(),
            ));
        }
        let system = self.system.as_ref().ok_or(TensaError::NotInitialized)?;
        if system.is_stale(&self.constraints) {
            return Err(TensaError::StaleSystem("constraints or weights changed"));
        }

        let start = Instant::now();
        let n = self.points.len();

        // 1. External forces, once per call
        for force in &self.forces {
            force.validate(n)?;
        }
        let mut forces = vec![DVec3::ZERO; n];
        for force in &self.forces {
            force.add_force(&self.points, &mut forces);
        }

        // 2. Inertial prediction, also used as the initial guess
        let timestep = self.config.timestep;
        let (previous, prediction) = if self.dynamic {
            let previous = self.points.to_vec();
            let prediction: Vec<DVec3> = previous
                .iter()
                .zip(&self.velocities)
                .map(|(&x, &v)| x + v * timestep)
                .collect();
            for (i, &y) in prediction.iter().enumerate() {
                self.points.set_point(i, y);
            }
            (previous, prediction)
        } else {
            (Vec::new(), Vec::new())
        };

        let max_arity = self
            .constraints
            .iter()
            .map(|c| c.indices().len())
            .max()
            .unwrap_or(0);
        let mut target = vec![DVec3::ZERO; max_arity];
        let mut projections = vec![DVec3::ZERO; system.rows()];
        let mut scratch = Vec::with_capacity(system.rows());
        let mut rhs = vec![0.0; n];
        let mut solution = [vec![0.0; n], vec![0.0; n], vec![0.0; n]];

        let mut sweeps = 0_u32;
        let mut degenerate = 0_usize;
        let mut relative_change = f64::MAX;

        for _ in 0..iterations {
            // === LOCAL STEP ===
            for (ci, constraint) in self.constraints.iter().enumerate() {
                let indices = constraint.indices();
                let local = &mut target[..indices.len()];
                if let Err(reason) = constraint.project(&self.points, local) {
                    degenerate += 1;
                    trace!(
                        constraint = ci,
                        kind = constraint.name(),
                        %reason,
                        "degenerate projection, holding current positions"
                    );
                    self.points.gather(indices, local);
                }

                let rows = &mut projections[system.row_offsets[ci]..system.row_offsets[ci + 1]];
                constraint.stencil().apply(local, rows);
                let scale = constraint.weight().sqrt();
                for p in rows.iter_mut() {
                    *p *= scale;
                }
            }

            // === GLOBAL STEP ===
            for (axis, sol) in solution.iter_mut().enumerate() {
                assemble_rhs(
                    &system.operator,
                    &projections,
                    &forces,
                    system.inertia,
                    &prediction,
                    axis,
                    &mut scratch,
                    &mut rhs,
                );
                self.linear
                    .solve(&rhs, sol)
                    .map_err(TensaError::LinearSolve)?;
                if !sol.iter().all(|v| v.is_finite()) {
                    return Err(TensaError::LinearSolve(format!(
                        "non-finite solution on axis {axis}"
                    )));
                }
            }

            // Convergence: ||x_new - x_old|| / ||x_old||
            let mut diff_sq = 0.0_f64;
            let mut norm_sq = 0.0_f64;
            for (axis, sol) in solution.iter().enumerate() {
                let channel = self.points.channel_mut(axis);
                for (old, &new) in channel.iter_mut().zip(sol) {
                    let d = new - *old;
                    diff_sq += d * d;
                    norm_sq += *old * *old;
                    *old = new;
                }
            }
            relative_change = if norm_sq > 1e-24 {
                (diff_sq / norm_sq).sqrt()
            } else {
                diff_sq.sqrt()
            };

            sweeps += 1;
            if relative_change < self.config.relative_tolerance {
                break;
            }
        }

        // Velocities from the position change over the whole call
        if self.dynamic {
            let keep = 1.0 - self.config.damping;
            for (i, (v, &x_old)) in self.velocities.iter_mut().zip(&previous).enumerate() {
                *v = (self.points.point(i) - x_old) / timestep * keep;
            }
        }

        let wall_time = start.elapsed().as_secs_f64();
        debug!(
            sweeps,
            degenerate,
            relative_change,
            wall_time,
            dynamic = self.dynamic,
            "solve finished"
        );

        Ok(SolveReport {
            sweeps,
            degenerate_projections: degenerate,
            relative_change,
            converged: relative_change < self.config.relative_tolerance,
            wall_time,
        })
    }
}

impl Default for ShapeSolver {
    fn default() -> Self {
        Self::new()
    }
}
