//! Numeric thresholds and solver defaults.

/// Default timestep for the dynamic (inertial) mode.
pub const DEFAULT_TIMESTEP: f64 = 1.0;

/// Default per-point mass for the dynamic mode.
pub const DEFAULT_MASS: f64 = 1.0;

/// Weight used for anchor (Closeness) constraints that approximate a hard pin.
pub const ANCHOR_WEIGHT: f64 = 1.0e5;

/// Edge lengths below this are treated as having no direction.
pub const DEGENERATE_LENGTH_THRESHOLD: f64 = 1.0e-12;

/// Triangle areas below this are treated as collapsed.
pub const DEGENERATE_AREA_THRESHOLD: f64 = 1.0e-16;

/// Relative threshold for rank tests on small covariance / normal-equation matrices.
pub const RELATIVE_RANK_THRESHOLD: f64 = 1.0e-12;
