//! Tensa CLI: form finding, cloth drape and scenario benchmarks.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tensa")]
#[command(version, about = "Tensa: constraint-based shape optimization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Form-find a tensile membrane over a sinusoidal boundary.
    Tensile {
        /// Scenario file (TOML); only the [tensile] section is used.
        #[arg(short, long)]
        config: Option<String>,

        /// Grid vertices per side (overrides the config).
        #[arg(long)]
        size: Option<usize>,

        /// Number of solver iterations (overrides the config).
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Output OBJ path.
        #[arg(short, long, default_value = "tensile_structure.obj")]
        output: String,
    },

    /// Drape a cloth hanging from two corners under gravity.
    Cloth {
        /// Scenario file (TOML); only the [cloth] section is used.
        #[arg(short, long)]
        config: Option<String>,

        /// Grid vertices per side (overrides the config).
        #[arg(long)]
        size: Option<usize>,

        /// Number of time steps (overrides the config).
        #[arg(short, long)]
        steps: Option<u32>,

        /// Output OBJ path.
        #[arg(short, long, default_value = "hanging_cloth.obj")]
        output: String,
    },

    /// Run scenarios and report metrics as CSV.
    Benchmark {
        /// Which scenario to run (tensile, cloth, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Scenario file (TOML).
        #[arg(short, long)]
        config: Option<String>,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the default scenario file.
    Config,

    /// Check that a scenario file parses and both scenarios initialize.
    Validate {
        /// Path to scenario file (TOML).
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tensile { config, size, iterations, output } => {
            commands::tensile(config.as_deref(), size, iterations, &output)
        }
        Commands::Cloth { config, size, steps, output } => {
            commands::cloth(config.as_deref(), size, steps, &output)
        }
        Commands::Benchmark { scenario, config, output } => {
            commands::benchmark(&scenario, config.as_deref(), output.as_deref())
        }
        Commands::Config => commands::print_config(),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
