//! Metrics collected while a scenario runs.

use serde::{Deserialize, Serialize};

/// Metrics collected from a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Scenario name.
    pub scenario: String,
    pub vertex_count: usize,
    pub face_count: usize,
    pub constraint_count: usize,
    /// Number of `solve` calls.
    pub steps: u32,
    /// Local-global sweeps over all steps.
    pub total_sweeps: u32,
    /// Projections skipped because of degenerate geometry.
    pub degenerate_projections: usize,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per step (seconds).
    pub avg_step_time: f64,
    pub max_step_time: f64,
    /// Relative position change of the last sweep.
    pub final_relative_change: f64,
    /// Maximum vertex displacement from the starting position.
    pub max_displacement: f64,
    /// Maximum distance an anchored vertex moved (should stay near zero).
    pub max_anchor_drift: f64,
    /// Shortest mesh edge relative to its starting length.
    pub min_edge_ratio: f64,
    /// Longest mesh edge relative to its starting length.
    pub max_edge_ratio: f64,
}

impl RunMetrics {
    /// CSV header matching [`RunMetrics::to_csv_row`].
    pub fn to_csv_header() -> String {
        "scenario,vertex_count,face_count,constraint_count,steps,total_sweeps,degenerate,total_wall_time_s,avg_step_ms,max_step_ms,final_rel_change,max_displacement,max_anchor_drift,min_edge_ratio,max_edge_ratio".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.6},{:.4},{:.4},{:.6e},{:.6},{:.6e},{:.4},{:.4}",
            self.scenario,
            self.vertex_count,
            self.face_count,
            self.constraint_count,
            self.steps,
            self.total_sweeps,
            self.degenerate_projections,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.final_relative_change,
            self.max_displacement,
            self.max_anchor_drift,
            self.min_edge_ratio,
            self.max_edge_ratio,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[RunMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
