//! LineScreen driver.
//!
//! Loads a line set, runs the requested number of frames through the
//! quadtree or brute-force pipeline, and prints the cumulative collision
//! counts. Exits 0 on success; any core error is rendered once on
//! stderr with a non-zero exit.

mod input;

use clap::{Parser, ValueEnum};
use linescreen_core::config::IndexConfig;
use linescreen_physics::{Algorithm, EngineConfig, SimulationEngine, World};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bouncing-lines screensaver simulation.
#[derive(Debug, Parser)]
#[command(name = "linescreen", version, about)]
struct Cli {
    /// Input file: one record per line (id x1 y1 x2 y2 vx vy)
    #[arg(short, long)]
    input: PathBuf,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 100)]
    frames: u64,

    /// Detection algorithm
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Quadtree)]
    algorithm: AlgorithmArg,

    /// Timestep per frame (seconds)
    #[arg(long, default_value_t = 0.5)]
    dt: f64,

    /// Worker threads for the parallel query (0 = rayon default)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Emit per-frame index statistics as JSON on stderr
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    /// Quadtree broad phase
    Quadtree,
    /// O(n²) all-pairs reference
    Brute,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Quadtree => Algorithm::Quadtree,
            AlgorithmArg::Brute => Algorithm::BruteForce,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let lines = input::load_lines(&cli.input)?;
    tracing::info!(lines = lines.len(), frames = cli.frames, "loaded world");

    let world = World::from_lines(lines)?;
    let config = EngineConfig {
        dt: cli.dt,
        algorithm: cli.algorithm.into(),
        index: IndexConfig {
            enable_debug_stats: cli.stats,
            ..IndexConfig::default()
        },
        num_threads: cli.threads,
        sort_events: true,
    };

    let mut engine = SimulationEngine::new(config, world)?;
    if cli.stats {
        for _ in 0..cli.frames {
            let summary = engine.step()?;
            eprintln!("{}", serde_json::to_string(&summary)?);
        }
    } else {
        engine.run(cli.frames)?;
    }

    println!("Line-Line Collisions: {}", engine.line_line_collisions());
    println!("Line-Wall Collisions: {}", engine.line_wall_collisions());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
