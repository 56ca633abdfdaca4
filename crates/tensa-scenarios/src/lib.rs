//! # tensa-scenarios
//!
//! Ready-made shape-optimization setups for the Tensa engine.
//!
//! Provides the tensile-membrane (static form finding) and hanging-cloth
//! (dynamic) scenarios, a runner that steps them, and metric collection
//! with CSV export.

pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use metrics::RunMetrics;
pub use runner::ScenarioRunner;
pub use scenarios::{ClothParams, Scenario, ScenarioConfig, ScenarioKind, TensileParams};
