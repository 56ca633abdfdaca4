//! CLI command implementations.

use std::path::Path;

use tensa_io::save_mesh_obj;
use tensa_scenarios::metrics::RunMetrics;
use tensa_scenarios::runner::ScenarioRunner;
use tensa_scenarios::scenarios::{Scenario, ScenarioConfig, ScenarioKind};
use tensa_types::TensaError;
use tracing::info;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load a scenario file, or the defaults when no path is given.
fn load_config(path: Option<&str>) -> Result<ScenarioConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ScenarioConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{path}': {e}"))?;
    let config: ScenarioConfig =
        toml::from_str(&text).map_err(|e| TensaError::InvalidConfig(e.to_string()))?;
    info!(path, "loaded scenario config");
    Ok(config)
}

fn print_metrics(metrics: &RunMetrics) {
    println!("  Wall time:     {:.3}s", metrics.total_wall_time);
    println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
    println!("  Sweeps:        {}", metrics.total_sweeps);
    println!("  Degenerate:    {}", metrics.degenerate_projections);
    println!("  Final change:  {:.3e}", metrics.final_relative_change);
    println!("  Max displace:  {:.4}", metrics.max_displacement);
    println!("  Anchor drift:  {:.3e}", metrics.max_anchor_drift);
    println!(
        "  Edge ratio:    [{:.4}, {:.4}]",
        metrics.min_edge_ratio, metrics.max_edge_ratio
    );
}

/// Run a built scenario and write the resulting mesh.
fn run_and_save(
    mut scenario: Scenario,
    output_path: &str,
    title: &str,
) -> CommandResult {
    println!(
        "Running: {} ({} verts, {} faces, {} constraints, {} steps)",
        scenario.kind.name(),
        scenario.mesh.vertex_count(),
        scenario.mesh.face_count(),
        scenario.solver.constraint_count(),
        scenario.steps,
    );

    let metrics = ScenarioRunner::run(&mut scenario)?;
    print_metrics(&metrics);

    let vertices = format!("Vertices: {}", scenario.mesh.vertex_count());
    let faces = format!("Faces: {}", scenario.mesh.face_count());
    save_mesh_obj(output_path, &scenario.mesh, &[title, vertices.as_str(), faces.as_str()])?;

    println!();
    println!("Mesh written to: {output_path}");
    Ok(())
}

/// Form-find the tensile membrane.
pub fn tensile(
    config_path: Option<&str>,
    size: Option<usize>,
    iterations: Option<u32>,
    output_path: &str,
) -> CommandResult {
    println!("Tensa Tensile Structure");
    println!("═══════════════════════");
    println!();

    let mut params = load_config(config_path)?.tensile;
    if let Some(n) = size {
        params.cols = n;
        params.rows = n;
    }
    if let Some(n) = iterations {
        params.iterations = n;
    }

    run_and_save(Scenario::tensile(&params)?, output_path, "Tensile structure mesh")
}

/// Drape the hanging cloth.
pub fn cloth(
    config_path: Option<&str>,
    size: Option<usize>,
    steps: Option<u32>,
    output_path: &str,
) -> CommandResult {
    println!("Tensa Hanging Cloth");
    println!("═══════════════════");
    println!();

    let mut params = load_config(config_path)?.cloth;
    if let Some(n) = size {
        params.cols = n;
        params.rows = n;
    }
    if let Some(n) = steps {
        params.steps = n;
    }

    run_and_save(Scenario::cloth(&params)?, output_path, "Hanging cloth mesh")
}

/// Run scenarios and collect metrics.
pub fn benchmark(
    scenario_name: &str,
    config_path: Option<&str>,
    output_path: Option<&str>,
) -> CommandResult {
    println!("Tensa Scenario Benchmark");
    println!("════════════════════════");
    println!();

    let config = load_config(config_path)?;
    let kinds: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        vec![scenario_name.parse::<ScenarioKind>()?]
    };

    let mut all_metrics = Vec::new();
    for kind in kinds {
        let mut scenario = Scenario::from_kind(kind, &config)?;
        println!(
            "Running: {} ({} verts, {} constraints, {} steps)",
            kind.name(),
            scenario.mesh.vertex_count(),
            scenario.solver.constraint_count(),
            scenario.steps,
        );
        let metrics = ScenarioRunner::run(&mut scenario)
            .map_err(|e| format!("Scenario '{}' failed: {e}", kind.name()))?;
        print_metrics(&metrics);
        println!();
        all_metrics.push(metrics);
    }

    let csv = RunMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }

    Ok(())
}

/// Print the default scenario file.
pub fn print_config() -> CommandResult {
    let text = toml::to_string_pretty(&ScenarioConfig::default())?;
    print!("{text}");
    Ok(())
}

/// Validate a scenario file.
pub fn validate(path: &str) -> CommandResult {
    println!("Tensa Config Validator");
    println!("──────────────────────");
    println!();

    if !Path::new(path).exists() {
        return Err(format!("File not found: {path}").into());
    }

    let config = load_config(Some(path))?;
    for &kind in ScenarioKind::all() {
        let mut scenario = Scenario::from_kind(kind, &config)?;
        scenario.solver.initialize(scenario.dynamic)?;
        println!(
            "  {:<8} ✓ {} verts, {} constraints",
            kind.name(),
            scenario.mesh.vertex_count(),
            scenario.solver.constraint_count(),
        );
    }

    println!();
    println!("✓ Config is valid");
    Ok(())
}
