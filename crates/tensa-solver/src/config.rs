//! Solver configuration.
//!
//! Parameters of the dynamic (inertial) mode plus the early-exit
//! tolerance. Static form finding ignores timestep, mass and damping.

use serde::{Deserialize, Serialize};
use tensa_types::{TensaError, TensaResult};

/// Configuration for the shape solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Timestep of one `solve` call in dynamic mode.
    pub timestep: f64,

    /// Per-point mass in dynamic mode. Adds `mass / timestep²` to the
    /// system diagonal.
    pub mass: f64,

    /// Velocity damping applied after each `solve` call
    /// (0.0 = none, 1.0 = velocities discarded).
    pub damping: f64,

    /// Relative position change below which `solve` stops sweeping early.
    /// Zero disables early exit, so `solve(n)` always runs `n` sweeps.
    pub relative_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timestep: tensa_types::constants::DEFAULT_TIMESTEP,
            mass: tensa_types::constants::DEFAULT_MASS,
            damping: 0.0,
            relative_tolerance: 0.0,
        }
    }
}

impl SolverConfig {
    /// Static form finding that stops once the shape settles.
    pub fn form_finding() -> Self {
        Self {
            relative_tolerance: 1e-10,
            ..Default::default()
        }
    }

    /// Dynamic cloth with light damping.
    pub fn cloth() -> Self {
        Self {
            damping: 0.01,
            ..Default::default()
        }
    }

    /// Fails with [`TensaError::InvalidConfig`] on out-of-range values.
    pub fn validate(&self) -> TensaResult<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(TensaError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(TensaError::InvalidConfig(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(TensaError::InvalidConfig(format!(
                "damping must be within [0, 1], got {}",
                self.damping
            )));
        }
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance >= 0.0) {
            return Err(TensaError::InvalidConfig(format!(
                "relative_tolerance must be non-negative, got {}",
                self.relative_tolerance
            )));
        }
        Ok(())
    }

    /// Diagonal inertia term `mass / timestep²`.
    pub fn inertia(&self) -> f64 {
        self.mass / (self.timestep * self.timestep)
    }
}
