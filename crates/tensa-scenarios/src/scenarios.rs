//! Procedural scenarios: grid + constraints + forces for each use case.
//!
//! Two canonical scenarios:
//! 1. **Tensile** — Membrane spanning a sinusoidal boundary, relaxed toward
//!    a minimal surface (static form finding)
//! 2. **Cloth** — Sheet hanging from two diagonal corners under gravity
//!    (dynamic)

use std::f64::consts::TAU;
use std::str::FromStr;

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use tensa_math::DVec3;
use tensa_mesh::generators::{grid, grid_diagonals, grid_edges, grid_index, GridFaces, GridPlane};
use tensa_mesh::PolyMesh;
use tensa_solver::{
    AreaConstraint, ClosenessConstraint, EdgeStrainConstraint, GravityForce, ShapeSolver,
    SolverConfig,
};
use tensa_types::constants::ANCHOR_WEIGHT;
use tensa_types::{TensaError, TensaResult};

/// Which scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Minimal-surface tensile membrane.
    Tensile,
    /// Cloth hanging from two corners.
    Cloth,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[ScenarioKind::Tensile, ScenarioKind::Cloth]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Tensile => "tensile",
            ScenarioKind::Cloth => "cloth",
        }
    }
}

impl FromStr for ScenarioKind {
    type Err = TensaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                TensaError::InvalidConfig(format!(
                    "Unknown scenario: '{s}'. Available: tensile, cloth"
                ))
            })
    }
}

/// Parameters of the tensile membrane scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensileParams {
    /// Grid vertices along X.
    pub cols: usize,
    /// Grid vertices along Y.
    pub rows: usize,
    /// Distance between neighboring grid vertices.
    pub spacing: f64,
    /// Peak height of the boundary wave.
    pub boundary_height: f64,
    /// Interior points start at a random height in `[-perturbation, perturbation]`.
    pub perturbation: f64,
    /// Seed for the interior perturbation.
    pub seed: u64,
    /// Weight of the boundary anchors.
    pub anchor_weight: f64,
    pub edge_weight: f64,
    pub edge_range: [f64; 2],
    pub diagonal_weight: f64,
    pub diagonal_range: [f64; 2],
    pub area_weight: f64,
    pub area_range: [f64; 2],
    pub gravity: [f64; 3],
    /// Number of single-sweep `solve` calls.
    pub iterations: u32,
    pub solver: SolverConfig,
}

impl Default for TensileParams {
    fn default() -> Self {
        Self {
            cols: 30,
            rows: 30,
            spacing: 0.1,
            boundary_height: 0.5,
            perturbation: 0.1,
            seed: 1,
            anchor_weight: ANCHOR_WEIGHT,
            edge_weight: 10.0,
            edge_range: [0.9, 1.1],
            diagonal_weight: 7.0,
            diagonal_range: [0.9, 1.2],
            area_weight: 1.0,
            area_range: [0.0, 0.5],
            gravity: [0.0, 0.0, -0.05],
            iterations: 1000,
            solver: SolverConfig::default(),
        }
    }
}

/// Parameters of the hanging cloth scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    /// Grid vertices along X.
    pub cols: usize,
    /// Grid vertices along Z.
    pub rows: usize,
    pub spacing: f64,
    /// Weight of the two corner anchors.
    pub anchor_weight: f64,
    pub edge_weight: f64,
    pub edge_range: [f64; 2],
    pub gravity: [f64; 3],
    /// Number of time steps (`solve` calls).
    pub steps: u32,
    /// Local-global sweeps per time step.
    pub sweeps_per_step: u32,
    pub solver: SolverConfig,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            spacing: 1.0,
            anchor_weight: ANCHOR_WEIGHT,
            edge_weight: 10.0,
            edge_range: [0.8, 1.2],
            gravity: [0.0, -0.1, 0.0],
            steps: 100,
            sweeps_per_step: 1,
            solver: SolverConfig::default(),
        }
    }
}

/// Scenario file contents: one section per scenario.
///
/// ```toml
/// [tensile]
/// cols = 40
/// iterations = 500
///
/// [cloth]
/// gravity = [0.0, -0.2, 0.0]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub tensile: TensileParams,
    pub cloth: ClothParams,
}

/// A fully specified scenario, ready to run.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Starting geometry and the faces written with the result.
    pub mesh: PolyMesh,
    /// Solver loaded with points, constraints and forces (not yet initialized).
    pub solver: ShapeSolver,
    /// Anchored vertex ids.
    pub anchors: Vec<usize>,
    /// Whether to initialize the solver in dynamic mode.
    pub dynamic: bool,
    /// Number of `solve` calls.
    pub steps: u32,
    /// Sweeps per `solve` call.
    pub sweeps_per_step: u32,
}

impl Scenario {
    /// Create the tensile membrane scenario.
    ///
    /// Every boundary vertex is anchored on the surface
    /// `h · (½ sin 2πu + ½) · (½ sin 2πv + ½)`; grid edges, cell diagonals
    /// and triangle areas pull the interior taut.
    pub fn tensile(params: &TensileParams) -> TensaResult<Self> {
        let (cols, rows) = (params.cols, params.rows);
        check_grid(cols, rows, params.spacing)?;
        let amplitude = params.perturbation;
        if !(amplitude.is_finite() && amplitude >= 0.0) {
            return Err(TensaError::InvalidConfig(format!(
                "perturbation must be finite and non-negative, got {amplitude}"
            )));
        }

        let mut mesh = grid(cols, rows, params.spacing, GridPlane::Xy, GridFaces::Triangles);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut anchors = Vec::new();
        for y in 0..rows {
            for x in 0..cols {
                let i = grid_index(cols, x, y);
                let mut p = mesh.positions.point(i);
                if x == 0 || y == 0 || x == cols - 1 || y == rows - 1 {
                    let u = x as f64 / (cols - 1) as f64;
                    let v = y as f64 / (rows - 1) as f64;
                    p.z = params.boundary_height
                        * ((u * TAU).sin() * 0.5 + 0.5)
                        * ((v * TAU).sin() * 0.5 + 0.5);
                    anchors.push(i);
                } else {
                    p.z = rng.gen_range(-amplitude..=amplitude);
                }
                mesh.positions.set_point(i, p);
            }
        }

        let points = mesh.positions.clone();
        let mut solver = ShapeSolver::with_config(params.solver.clone());
        solver.set_points(points.clone())?;

        for &a in &anchors {
            solver.add_constraint(Box::new(ClosenessConstraint::new(
                &[a],
                params.anchor_weight,
                &points,
            )?));
        }
        for edge in grid_edges(cols, rows) {
            let [lo, hi] = params.edge_range;
            let c = EdgeStrainConstraint::new(&edge, params.edge_weight, &points)?.with_range(lo, hi)?;
            solver.add_constraint(Box::new(c));
        }
        for edge in grid_diagonals(cols, rows) {
            let [lo, hi] = params.diagonal_range;
            let c = EdgeStrainConstraint::new(&edge, params.diagonal_weight, &points)?
                .with_range(lo, hi)?;
            solver.add_constraint(Box::new(c));
        }
        for face in &mesh.faces {
            let [lo, hi] = params.area_range;
            let c = AreaConstraint::new(face, params.area_weight, &points)?.with_range(lo, hi)?;
            solver.add_constraint(Box::new(c));
        }
        solver.add_force(Box::new(GravityForce::new(DVec3::from_array(params.gravity))?));

        Ok(Self {
            kind: ScenarioKind::Tensile,
            mesh,
            solver,
            anchors,
            dynamic: false,
            steps: params.iterations,
            sweeps_per_step: 1,
        })
    }

    /// Create the hanging cloth scenario.
    ///
    /// A flat sheet in the XZ plane, anchored at `(0, 0)` and
    /// `(cols-1, rows-1)`, with stretchable grid edges.
    pub fn cloth(params: &ClothParams) -> TensaResult<Self> {
        let (cols, rows) = (params.cols, params.rows);
        check_grid(cols, rows, params.spacing)?;
        if params.sweeps_per_step == 0 {
            return Err(TensaError::InvalidConfig(
                "sweeps_per_step must be at least 1".into(),
            ));
        }

        let mesh = grid(cols, rows, params.spacing, GridPlane::Xz, GridFaces::Quads);
        let points = mesh.positions.clone();
        let anchors = vec![grid_index(cols, 0, 0), grid_index(cols, cols - 1, rows - 1)];

        let mut solver = ShapeSolver::with_config(params.solver.clone());
        solver.set_points(points.clone())?;
        for &a in &anchors {
            solver.add_constraint(Box::new(ClosenessConstraint::new(
                &[a],
                params.anchor_weight,
                &points,
            )?));
        }
        for edge in grid_edges(cols, rows) {
            let [lo, hi] = params.edge_range;
            let c = EdgeStrainConstraint::new(&edge, params.edge_weight, &points)?.with_range(lo, hi)?;
            solver.add_constraint(Box::new(c));
        }
        solver.add_force(Box::new(GravityForce::new(DVec3::from_array(params.gravity))?));

        Ok(Self {
            kind: ScenarioKind::Cloth,
            mesh,
            solver,
            anchors,
            dynamic: true,
            steps: params.steps,
            sweeps_per_step: params.sweeps_per_step,
        })
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind, config: &ScenarioConfig) -> TensaResult<Self> {
        match kind {
            ScenarioKind::Tensile => Self::tensile(&config.tensile),
            ScenarioKind::Cloth => Self::cloth(&config.cloth),
        }
    }
}

fn check_grid(cols: usize, rows: usize, spacing: f64) -> TensaResult<()> {
    if cols < 2 || rows < 2 {
        return Err(TensaError::InvalidConfig(format!(
            "grid needs at least 2×2 vertices, got {cols}×{rows}"
        )));
    }
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(TensaError::InvalidConfig(format!(
            "grid spacing must be positive, got {spacing}"
        )));
    }
    Ok(())
}
