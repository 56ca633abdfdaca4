//! Scenario runner: initializes the solver, steps it and collects metrics.

use std::time::Instant;

use tensa_mesh::topology::Topology;
use tensa_types::TensaResult;
use tracing::info;

use crate::metrics::RunMetrics;
use crate::scenarios::Scenario;

/// Runs scenarios and collects metrics.
pub struct ScenarioRunner;

impl ScenarioRunner {
    /// Run a scenario to completion.
    ///
    /// On return `scenario.mesh` holds the optimized positions and the
    /// solver stays initialized, so callers may keep stepping it.
    pub fn run(scenario: &mut Scenario) -> TensaResult<RunMetrics> {
        let name = scenario.kind.name();
        let initial = scenario.mesh.positions.clone();

        scenario.solver.initialize(scenario.dynamic)?;

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.steps as usize);
        let mut total_sweeps: u32 = 0;
        let mut degenerate_projections: usize = 0;
        let mut final_relative_change = 0.0;
        let report_every = (scenario.steps / 5).max(1);

        let total_start = Instant::now();

        for step in 0..scenario.steps {
            let report = scenario.solver.solve(scenario.sweeps_per_step)?;
            step_times.push(report.wall_time);
            total_sweeps += report.sweeps;
            degenerate_projections += report.degenerate_projections;
            final_relative_change = report.relative_change;

            if (step + 1) % report_every == 0 {
                info!(
                    scenario = name,
                    step = step + 1,
                    steps = scenario.steps,
                    relative_change = report.relative_change,
                    "progress"
                );
            }
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();

        scenario.mesh.set_positions(scenario.solver.points().clone())?;
        let result = &scenario.mesh.positions;

        let max_displacement = (0..result.len())
            .map(|i| result.point(i).distance(initial.point(i)))
            .fold(0.0, f64::max);

        // Edge length ratios relative to the starting geometry
        let topology = Topology::build(&scenario.mesh);
        let (min_edge_ratio, max_edge_ratio) = topology
            .edges
            .iter()
            .filter_map(|&[a, b]| {
                let rest = initial.point(a).distance(initial.point(b));
                (rest > 0.0).then(|| result.point(a).distance(result.point(b)) / rest)
            })
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), r| (lo.min(r), hi.max(r)));
        let min_edge_ratio = if min_edge_ratio.is_finite() { min_edge_ratio } else { 0.0 };

        let max_anchor_drift = scenario
            .anchors
            .iter()
            .map(|&a| result.point(a).distance(initial.point(a)))
            .fold(0.0, f64::max);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        info!(
            scenario = name,
            total_sweeps,
            degenerate_projections,
            wall_time = total_wall_time,
            "scenario finished"
        );

        Ok(RunMetrics {
            scenario: name.to_string(),
            vertex_count: scenario.mesh.vertex_count(),
            face_count: scenario.mesh.face_count(),
            constraint_count: scenario.solver.constraint_count(),
            steps: scenario.steps,
            total_sweeps,
            degenerate_projections,
            total_wall_time,
            avg_step_time: avg_step,
            max_step_time: max_step,
            final_relative_change,
            max_displacement,
            max_anchor_drift,
            min_edge_ratio,
            max_edge_ratio,
        })
    }
}
